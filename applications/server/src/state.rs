/// Shared application state
use crate::{
    config::{ProviderSettings, ServerConfig},
    error::{Result, ServerError},
};
use soundroom_playback::{PlaybackProvider, SimulatedProvider};
use soundroom_session::{
    ConfiguredPolicy, InMemoryCatalog, ProviderCredentials, ProviderRegistry, RoomRegistry,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Catalog served when no catalog file is configured
const DEMO_CATALOG: &str = include_str!("../catalog.json");

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RoomRegistry>,
}

impl AppState {
    pub fn new(rooms: Arc<RoomRegistry>) -> Self {
        Self { rooms }
    }

    /// Build the room registry described by `config`
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let catalog = load_catalog(config)?;
        tracing::info!("Catalog loaded with {} tracks", catalog.len());

        let policy = ConfiguredPolicy::new(
            config.access.controllers.iter().map(String::as_str),
            config.access.open_controls,
        );

        let providers = default_providers(&config.providers);
        if !providers.contains(&config.session.provider) {
            return Err(ServerError::Config(format!(
                "Unknown playback provider '{}' (available: {})",
                config.session.provider,
                providers.names().join(", ")
            )));
        }

        let rooms = RoomRegistry::new(
            config.session.clone(),
            providers,
            Arc::new(catalog),
            Arc::new(policy),
        );
        Ok(Self::new(Arc::new(rooms)))
    }
}

/// Providers available to every room
///
/// `simulated` needs no account. Every other entry in `accounts` is offered
/// once both of its credentials are set; those accounts play through the
/// simulated transport.
pub fn default_providers(accounts: &BTreeMap<String, ProviderSettings>) -> ProviderRegistry {
    let mut providers = ProviderRegistry::new();
    providers.register("simulated", |room| -> Arc<dyn PlaybackProvider> {
        Arc::new(SimulatedProvider::new(format!("simulated:{}", room)))
    });

    for (name, account) in accounts {
        if name == "simulated" {
            tracing::warn!("Ignoring credentials for the built-in simulated provider");
            continue;
        }
        let credentials =
            ProviderCredentials::from_parts(account.client_id.clone(), account.client_secret.clone());
        let label = name.clone();
        let registered = providers.register_with_credentials(
            name,
            credentials,
            move |credentials, room| -> Arc<dyn PlaybackProvider> {
                tracing::debug!(
                    "Creating {} provider for room {} (client {})",
                    label,
                    room,
                    credentials.client_id
                );
                Arc::new(SimulatedProvider::new(format!("{}:{}", label, room)))
            },
        );
        if registered {
            tracing::info!("Playback provider '{}' enabled", name);
        }
    }
    providers
}

fn load_catalog(config: &ServerConfig) -> Result<InMemoryCatalog> {
    let json = match &config.catalog.path {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEMO_CATALOG.to_string(),
    };
    InMemoryCatalog::from_json(&json).map_err(|e| ServerError::Config(format!("Invalid catalog: {}", e)))
}
