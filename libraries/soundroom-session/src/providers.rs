//! Playback providers keyed by name
//!
//! Each room gets its own provider instance from a named factory. A provider
//! that needs credentials is only registered when they are configured.

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use soundroom_core::RoomId;
use soundroom_playback::PlaybackProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

type ProviderFactory = Arc<dyn Fn(&RoomId) -> Arc<dyn PlaybackProvider> + Send + Sync>;

/// Client credentials for an external provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ProviderCredentials {
    /// Credentials if both parts are present and non-empty
    pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Some(Self {
                    client_id,
                    client_secret,
                })
            }
            _ => None,
        }
    }
}

/// Name-to-factory table of playback providers
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider that needs no credentials
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&RoomId) -> Arc<dyn PlaybackProvider> + Send + Sync + 'static,
    {
        let name = name.into();
        info!(provider = %name, "provider registered");
        self.factories.insert(name, Arc::new(factory));
    }

    /// Register a provider only if its credentials are configured
    ///
    /// Returns whether the provider was registered.
    pub fn register_with_credentials<F>(
        &mut self,
        name: &str,
        credentials: Option<ProviderCredentials>,
        build: F,
    ) -> bool
    where
        F: Fn(&ProviderCredentials, &RoomId) -> Arc<dyn PlaybackProvider> + Send + Sync + 'static,
    {
        let Some(credentials) = credentials else {
            info!(provider = name, "provider credentials not configured, skipping");
            return false;
        };

        self.register(name, move |room| build(&credentials, room));
        true
    }

    /// Create a provider instance for `room`
    pub fn create(&self, name: &str, room: &RoomId) -> Result<Arc<dyn PlaybackProvider>> {
        self.factories
            .get(name)
            .map(|factory| factory(room))
            .ok_or_else(|| SessionError::UnknownProvider(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}
