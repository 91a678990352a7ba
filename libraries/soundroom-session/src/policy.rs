/// Access policy backed by configuration
use soundroom_core::{AccessPolicy, QueueEntry, VoterId};
use std::collections::HashSet;

/// Policy with a fixed set of room controllers
///
/// - Controllers may remove any entry and drive the transport.
/// - Any member may remove an entry they submitted.
/// - With `open_controls`, every member may drive the transport.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPolicy {
    controllers: HashSet<VoterId>,
    open_controls: bool,
}

impl ConfiguredPolicy {
    pub fn new<I, S>(controllers: I, open_controls: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            controllers: controllers
                .into_iter()
                .map(VoterId::new)
                .collect(),
            open_controls,
        }
    }

    /// Policy that lets everyone do everything
    pub fn permissive() -> Self {
        Self {
            controllers: HashSet::new(),
            open_controls: true,
        }
    }

    pub fn is_controller(&self, user: &VoterId) -> bool {
        self.controllers.contains(user)
    }
}

impl AccessPolicy for ConfiguredPolicy {
    fn can_remove_track(&self, entry: &QueueEntry, user: &VoterId) -> bool {
        self.open_controls || self.is_controller(user) || entry.submitted_by == *user
    }

    fn can_control_playback(&self, user: &VoterId) -> bool {
        self.open_controls || self.is_controller(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundroom_core::{Track, TrackId};

    fn entry_by(user: &str) -> QueueEntry {
        let track = Track::new(TrackId::new("t"), "T", "sim:t", 1_000);
        QueueEntry::new(track, VoterId::new(user), 1)
    }

    #[test]
    fn submitter_may_remove_own_entry() {
        let policy = ConfiguredPolicy::new(["dj"], false);
        let entry = entry_by("alice");

        assert!(policy.can_remove_track(&entry, &VoterId::new("alice")));
        assert!(policy.can_remove_track(&entry, &VoterId::new("dj")));
        assert!(!policy.can_remove_track(&entry, &VoterId::new("bob")));
    }

    #[test]
    fn only_controllers_drive_transport() {
        let policy = ConfiguredPolicy::new(["dj"], false);
        assert!(policy.can_control_playback(&VoterId::new("dj")));
        assert!(!policy.can_control_playback(&VoterId::new("alice")));

        let open = ConfiguredPolicy::permissive();
        assert!(open.can_control_playback(&VoterId::new("alice")));
    }
}
