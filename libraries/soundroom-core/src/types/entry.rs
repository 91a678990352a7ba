/// Queue entry domain type
use crate::types::{EntryId, Track, VoterId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A queued track plus the members who upvoted it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Entry identifier
    pub id: EntryId,

    /// The queued track
    pub track: Track,

    /// Member who added the track
    pub submitted_by: VoterId,

    /// Members who upvoted this entry; a voter appears at most once
    pub voters: BTreeSet<VoterId>,

    /// Monotonic arrival order within the room, never renumbered
    pub sequence: u64,
}

impl QueueEntry {
    /// Create an entry with no votes
    pub fn new(track: Track, submitted_by: VoterId, sequence: u64) -> Self {
        Self {
            id: EntryId::generate(),
            track,
            submitted_by,
            voters: BTreeSet::new(),
            sequence,
        }
    }

    /// Number of upvotes
    pub fn vote_count(&self) -> usize {
        self.voters.len()
    }

    /// Whether `voter` already upvoted this entry
    pub fn has_voted(&self, voter: &VoterId) -> bool {
        self.voters.contains(voter)
    }
}
