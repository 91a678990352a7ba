//! Room registry tests

mod common;

use common::{catalog, policy, settle, FakeProvider};
use soundroom_core::{PlaybackStatus, RoomId, VoterId};
use soundroom_playback::{PlaybackProvider, SimulatedProvider};
use soundroom_session::{ProviderRegistry, RoomRegistry, SessionConfig, SessionError};
use std::sync::Arc;

fn registry() -> RoomRegistry {
    let mut providers = ProviderRegistry::new();
    providers.register("simulated", |room: &RoomId| -> Arc<dyn PlaybackProvider> {
        Arc::new(SimulatedProvider::new(format!("simulated:{}", room)))
    });
    providers.register("fake", |_: &RoomId| -> Arc<dyn PlaybackProvider> {
        FakeProvider::new()
    });
    RoomRegistry::new(SessionConfig::default(), providers, catalog(), policy())
}

#[tokio::test(start_paused = true)]
async fn create_list_and_get_rooms() {
    let rooms = registry();

    rooms.create(RoomId::new("lounge"), "fake").await.unwrap();
    rooms.create(RoomId::new("attic"), "simulated").await.unwrap();

    assert_eq!(rooms.list().await, vec![RoomId::new("attic"), RoomId::new("lounge")]);

    let handle = rooms.get(&RoomId::new("lounge")).await.unwrap();
    assert_eq!(handle.room(), &RoomId::new("lounge"));
}

#[tokio::test(start_paused = true)]
async fn creating_existing_room_returns_same_session() {
    let rooms = registry();

    let first = rooms.create(RoomId::new("lounge"), "fake").await.unwrap();
    settle().await;
    first.enqueue("sim:a", VoterId::new("alice")).await.unwrap();

    let second = rooms.create(RoomId::new("lounge"), "fake").await.unwrap();
    let snapshot = second.snapshot().await.unwrap();
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(rooms.list().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rooms_are_independent() {
    let rooms = registry();

    let lounge = rooms.create(RoomId::new("lounge"), "fake").await.unwrap();
    let attic = rooms.create(RoomId::new("attic"), "fake").await.unwrap();
    settle().await;

    lounge.enqueue("sim:a", VoterId::new("alice")).await.unwrap();
    lounge.enqueue("sim:b", VoterId::new("alice")).await.unwrap();

    let attic_snapshot = attic.snapshot().await.unwrap();
    assert_eq!(attic_snapshot.status, PlaybackStatus::Idle);
    assert!(attic_snapshot.queue.is_empty());
    assert_eq!(lounge.snapshot().await.unwrap().queue.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_provider_is_rejected() {
    let rooms = registry();

    let err = rooms.create(RoomId::new("lounge"), "spotify").await.unwrap_err();
    assert!(matches!(err, SessionError::UnknownProvider(name) if name == "spotify"));
    assert!(rooms.list().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn get_or_create_uses_default_provider() {
    let rooms = registry();
    assert_eq!(rooms.config().provider, "simulated");

    let handle = rooms.get_or_create(RoomId::new("lounge")).await.unwrap();
    let again = rooms.get_or_create(RoomId::new("lounge")).await.unwrap();

    assert_eq!(handle.room(), again.room());
    assert_eq!(rooms.list().await, vec![RoomId::new("lounge")]);
}

#[tokio::test(start_paused = true)]
async fn teardown_closes_the_room() {
    let rooms = registry();
    let handle = rooms.create(RoomId::new("lounge"), "fake").await.unwrap();

    rooms.teardown(&RoomId::new("lounge")).await.unwrap();
    settle().await;

    assert!(handle.is_closed());
    assert!(matches!(
        rooms.get(&RoomId::new("lounge")).await,
        Err(SessionError::RoomNotFound(_))
    ));
    assert!(matches!(
        handle.vote(soundroom_core::EntryId::generate(), VoterId::new("bob")).await,
        Err(SessionError::SessionClosed)
    ));
    assert!(matches!(
        rooms.teardown(&RoomId::new("lounge")).await,
        Err(SessionError::RoomNotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn search_goes_through_the_catalog() {
    let rooms = registry();

    let found = rooms.search("track b").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].uri, "sim:b");
    assert!(rooms.search("  ").await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn shutdown_all_closes_every_room() {
    let rooms = registry();
    let lounge = rooms.create(RoomId::new("lounge"), "fake").await.unwrap();
    let attic = rooms.create(RoomId::new("attic"), "fake").await.unwrap();

    rooms.shutdown_all().await;

    assert!(lounge.is_closed());
    assert!(attic.is_closed());
    assert!(rooms.list().await.is_empty());
}
