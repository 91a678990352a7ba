//! Upvote-ordered queue
//!
//! Entries are kept sorted by:
//! - vote count, highest first
//! - insertion sequence, earliest first
//!
//! Sequence numbers are unique per queue, so the order is total and depends
//! only on the entry set, never on the history of votes that produced it.

use crate::error::QueueError;
use soundroom_core::{EntryId, QueueEntry, Track, VoterId};
use std::cmp::Ordering;

/// Ranking used for play order
///
/// Pure function of the two entries. Ties on votes fall back to arrival order.
pub fn rank_order(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    b.vote_count()
        .cmp(&a.vote_count())
        .then_with(|| a.sequence.cmp(&b.sequence))
}

/// Pending entries of one room
///
/// Structure:
/// ```text
/// B  (3 votes, seq 2)   <- pop_next
/// D  (3 votes, seq 4)
/// A  (0 votes, seq 1)
/// C  (0 votes, seq 3)
/// ```
#[derive(Debug, Clone)]
pub struct QueueManager {
    /// Entries in play order
    entries: Vec<QueueEntry>,

    /// Sequence number handed to the next enqueued entry
    next_sequence: u64,
}

impl QueueManager {
    /// Create new empty queue
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Append a track with no votes
    ///
    /// Duplicate tracks are allowed; each call creates a distinct entry.
    pub fn enqueue(&mut self, track: Track, submitted_by: VoterId) -> QueueEntry {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let entry = QueueEntry::new(track, submitted_by, sequence);
        self.entries.push(entry.clone());
        self.resort();
        entry
    }

    /// Upvote an entry and reorder
    ///
    /// Returns the new vote count.
    pub fn add_vote(&mut self, entry_id: EntryId, voter: VoterId) -> Result<usize, QueueError> {
        let entry = self.find_mut(entry_id)?;
        if entry.has_voted(&voter) {
            return Err(QueueError::AlreadyVoted {
                entry: entry_id,
                voter,
            });
        }

        entry.voters.insert(voter);
        let count = entry.vote_count();
        self.resort();
        Ok(count)
    }

    /// Withdraw an upvote and reorder
    ///
    /// Returns the new vote count.
    pub fn remove_vote(&mut self, entry_id: EntryId, voter: &VoterId) -> Result<usize, QueueError> {
        let entry = self.find_mut(entry_id)?;
        if !entry.voters.remove(voter) {
            return Err(QueueError::NotVoted {
                entry: entry_id,
                voter: voter.clone(),
            });
        }

        let count = entry.vote_count();
        self.resort();
        Ok(count)
    }

    /// Remove an entry without playing it
    ///
    /// Remaining entries keep their sequence numbers.
    pub fn remove_entry(&mut self, entry_id: EntryId) -> Result<QueueEntry, QueueError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(QueueError::NotFound(entry_id))?;
        Ok(self.entries.remove(index))
    }

    /// Remove and return the highest-ranked entry
    ///
    /// `None` means the queue is empty, which is a normal terminal condition.
    pub fn pop_next(&mut self) -> Option<QueueEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Highest-ranked entry without removing it
    pub fn peek_next(&self) -> Option<&QueueEntry> {
        self.entries.first()
    }

    /// Look up an entry by id
    pub fn get(&self, entry_id: EntryId) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    /// Entries in play order
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Get queue length
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find_mut(&mut self, entry_id: EntryId) -> Result<&mut QueueEntry, QueueError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or(QueueError::NotFound(entry_id))
    }

    fn resort(&mut self) {
        self.entries.sort_by(rank_order);
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new()
    }
}
