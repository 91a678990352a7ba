/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use soundroom_session::SessionConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub access: AccessSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Streaming accounts keyed by provider name
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSettings>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Who may control playback and remove other people's entries
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessSettings {
    #[serde(default)]
    pub controllers: Vec<String>,

    /// Let every listener use transport controls
    #[serde(default)]
    pub open_controls: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// JSON track list; the bundled demo catalog is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Account credentials for one playback provider
///
/// A provider is only offered when both parts are set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `soundroom.toml` in the working directory; a missing
    /// default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("soundroom.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. SOUNDROOM_SERVER__PORT
        settings = settings.add_source(
            config::Environment::with_prefix("SOUNDROOM")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServerError::Config("server.port must be non-zero".to_string()));
        }

        if self.session.provider.trim().is_empty() {
            return Err(ServerError::Config(
                "session.provider must name a playback provider".to_string(),
            ));
        }

        let machine = &self.session.machine;
        if machine.sample_interval_ms == 0 {
            return Err(ServerError::Config(
                "session.machine.sample_interval_ms must be non-zero".to_string(),
            ));
        }
        if machine.end_epsilon_seconds < 0.0 {
            return Err(ServerError::Config(
                "session.machine.end_epsilon_seconds must not be negative".to_string(),
            ));
        }

        if let Some(path) = &self.catalog.path {
            if !path.is_file() {
                return Err(ServerError::Config(format!(
                    "Catalog file not found at {:?}",
                    path
                )));
            }
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            session: SessionConfig::default(),
            access: AccessSettings::default(),
            catalog: CatalogSettings::default(),
            providers: BTreeMap::new(),
        }
    }
}
