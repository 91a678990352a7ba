//! Rooms by id
//!
//! Each room is an independent coordinator task; rooms never share state and
//! run in parallel.

use crate::{
    config::SessionConfig,
    coordinator::SessionCoordinator,
    error::{Result, SessionError},
    handle::SessionHandle,
    providers::ProviderRegistry,
};
use soundroom_core::{AccessPolicy, Catalog, RoomId, Track};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::info;

/// Registry of live rooms
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, SessionHandle>>,
    providers: ProviderRegistry,
    catalog: Arc<dyn Catalog>,
    policy: Arc<dyn AccessPolicy>,
    config: SessionConfig,
}

impl RoomRegistry {
    pub fn new(
        config: SessionConfig,
        providers: ProviderRegistry,
        catalog: Arc<dyn Catalog>,
        policy: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            providers,
            catalog,
            policy,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Catalog search, bounded by the catalog timeout
    pub async fn search(&self, text: &str) -> Result<Vec<Track>> {
        Ok(timeout(self.config.catalog_timeout(), self.catalog.search(text))
            .await
            .map_err(|_| SessionError::Timeout("catalog search"))??)
    }

    /// Get a room, creating it with the default provider if needed
    pub async fn get_or_create(&self, room: RoomId) -> Result<SessionHandle> {
        if let Ok(handle) = self.get(&room).await {
            return Ok(handle);
        }
        let provider = self.config.provider.clone();
        self.create(room, &provider).await
    }

    /// Create a room playing through the named provider
    ///
    /// Returns the existing handle if the room is already running.
    pub async fn create(&self, room: RoomId, provider_name: &str) -> Result<SessionHandle> {
        let mut rooms = self.rooms.write().await;
        if let Some(handle) = rooms.get(&room).filter(|handle| !handle.is_closed()) {
            return Ok(handle.clone());
        }

        let provider = self.providers.create(provider_name, &room)?;
        let handle = SessionCoordinator::spawn(
            room.clone(),
            &self.config,
            provider,
            Arc::clone(&self.catalog),
            Arc::clone(&self.policy),
        );

        info!(room = %room, provider = provider_name, "room created");
        rooms.insert(room, handle.clone());
        Ok(handle)
    }

    /// Look up a running room
    pub async fn get(&self, room: &RoomId) -> Result<SessionHandle> {
        self.rooms
            .read()
            .await
            .get(room)
            .filter(|handle| !handle.is_closed())
            .cloned()
            .ok_or_else(|| SessionError::RoomNotFound(room.clone()))
    }

    /// Ids of running rooms, sorted
    pub async fn list(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self
            .rooms
            .read()
            .await
            .iter()
            .filter(|(_, handle)| !handle.is_closed())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Stop a room and forget it
    pub async fn teardown(&self, room: &RoomId) -> Result<()> {
        let handle = self
            .rooms
            .write()
            .await
            .remove(room)
            .ok_or_else(|| SessionError::RoomNotFound(room.clone()))?;
        handle.shutdown();
        info!(room = %room, "room torn down");
        Ok(())
    }

    /// Stop every room
    pub async fn shutdown_all(&self) {
        let rooms: Vec<SessionHandle> = self.rooms.write().await.drain().map(|(_, h)| h).collect();
        for handle in rooms {
            handle.shutdown();
        }
    }
}
