//! Explicit ordering for transports that do not guarantee FIFO delivery.
//!
//! The sender wraps each message in a [`Sequenced`] envelope carrying its
//! epoch and a counter starting at 1. The receiver feeds envelopes through a
//! [`Reorderer`], which releases them in counter order. Stale and duplicate
//! envelopes are dropped. A missing counter is waited for while at most
//! `window` later envelopes are buffered; past that the gap is skipped.
//!
//! Restarts are explicit. [`Sequencer::reset`] moves the sender to a new
//! epoch, and a fresh sender (a reloaded webview) draws its epoch from
//! [`incarnation_nonce`]. The receiver resets when the epoch changes and
//! drops anything still arriving from an epoch it has already left.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::correlation::incarnation_nonce;

pub const FIRST_SEQ: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequenced<T> {
    pub epoch: u32,
    pub seq: u64,
    pub message: T,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    epoch: u32,
    next: u64,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::with_epoch(incarnation_nonce())
    }
}

impl Sequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_epoch(epoch: u32) -> Self {
        Self {
            epoch,
            next: FIRST_SEQ,
        }
    }

    #[must_use]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn wrap<T>(&mut self, message: T) -> Sequenced<T> {
        let seq = self.next;
        self.next = self.next.saturating_add(1);
        Sequenced {
            epoch: self.epoch,
            seq,
            message,
        }
    }

    /// Start a new epoch numbered from [`FIRST_SEQ`].
    pub fn reset(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.next = FIRST_SEQ;
    }
}

#[derive(Debug)]
pub struct Reorderer<T> {
    epoch: Option<u32>,
    retired: Vec<u32>,
    expected: u64,
    window: usize,
    pending: BTreeMap<u64, T>,
    dropped: u64,
    skipped: u64,
}

impl<T> Reorderer<T> {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            epoch: None,
            retired: Vec::new(),
            expected: FIRST_SEQ,
            window,
            pending: BTreeMap::new(),
            dropped: 0,
            skipped: 0,
        }
    }

    /// Accept one envelope and return every message that is now deliverable, in order.
    pub fn push(&mut self, envelope: Sequenced<T>) -> Vec<T> {
        let Sequenced {
            epoch,
            seq,
            message,
        } = envelope;
        match self.epoch {
            Some(current) if current == epoch => {}
            _ if self.retired.contains(&epoch) => {
                warn!(epoch, seq, "dropping message from a retired sender epoch");
                self.dropped += 1;
                return Vec::new();
            }
            Some(current) => {
                info!(
                    previous = current,
                    epoch,
                    buffered = self.pending.len(),
                    "sender restarted its sequence"
                );
                self.retired.push(current);
                self.restart(epoch);
            }
            None => self.restart(epoch),
        }
        if seq < self.expected || self.pending.contains_key(&seq) {
            warn!(seq, expected = self.expected, "dropping stale or duplicate message");
            self.dropped += 1;
            return Vec::new();
        }

        self.pending.insert(seq, message);
        let mut ready = Vec::new();
        self.drain_into(&mut ready);
        while self.pending.len() > self.window {
            let Some(&first) = self.pending.keys().next() else {
                break;
            };
            warn!(
                from = self.expected,
                to = first - 1,
                "skipping missing messages"
            );
            self.skipped += first - self.expected;
            self.expected = first;
            self.drain_into(&mut ready);
        }
        ready
    }

    fn restart(&mut self, epoch: u32) {
        self.epoch = Some(epoch);
        self.pending.clear();
        self.expected = FIRST_SEQ;
    }

    fn drain_into(&mut self, ready: &mut Vec<T>) {
        while let Some(message) = self.pending.remove(&self.expected) {
            ready.push(message);
            self.expected += 1;
        }
    }

    /// Epoch of the sender incarnation currently being followed.
    #[must_use]
    pub fn epoch(&self) -> Option<u32> {
        self.epoch
    }

    #[must_use]
    pub fn expected(&self) -> u64 {
        self.expected
    }

    #[must_use]
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Stale or duplicate envelopes discarded so far.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Counters given up on because the gap outgrew the window.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPOCH: u32 = 7;

    fn env(seq: u64) -> Sequenced<u64> {
        env_in(EPOCH, seq)
    }

    fn env_in(epoch: u32, seq: u64) -> Sequenced<u64> {
        Sequenced {
            epoch,
            seq,
            message: seq,
        }
    }

    #[test]
    fn sequencer_counts_from_one() {
        let mut sequencer = Sequencer::with_epoch(EPOCH);
        assert_eq!(sequencer.wrap("a").seq, 1);
        assert_eq!(sequencer.wrap("b").seq, 2);
        sequencer.reset();
        let restarted = sequencer.wrap("c");
        assert_eq!(restarted.seq, 1);
        assert_eq!(restarted.epoch, EPOCH + 1);
    }

    #[test]
    fn fresh_sequencers_start_in_distinct_epochs() {
        assert_ne!(Sequencer::new().epoch(), Sequencer::new().epoch());
    }

    #[test]
    fn in_order_delivery_passes_through() {
        let mut reorderer = Reorderer::new(4);
        assert_eq!(reorderer.push(env(1)), vec![1]);
        assert_eq!(reorderer.push(env(2)), vec![2]);
        assert_eq!(reorderer.expected(), 3);
    }

    #[test]
    fn out_of_order_delivery_is_restored() {
        let mut reorderer = Reorderer::new(4);
        assert!(reorderer.push(env(3)).is_empty());
        assert!(reorderer.push(env(2)).is_empty());
        assert_eq!(reorderer.buffered(), 2);
        assert_eq!(reorderer.push(env(1)), vec![1, 2, 3]);
        assert_eq!(reorderer.buffered(), 0);
    }

    #[test]
    fn duplicates_and_stale_messages_are_dropped() {
        let mut reorderer = Reorderer::new(4);
        assert_eq!(reorderer.push(env(1)), vec![1]);
        assert_eq!(reorderer.push(env(2)), vec![2]);
        assert!(reorderer.push(env(2)).is_empty());
        assert!(reorderer.push(env(4)).is_empty());
        assert!(reorderer.push(env(4)).is_empty());
        assert_eq!(reorderer.dropped(), 2);
        assert_eq!(reorderer.push(env(3)), vec![3, 4]);
    }

    #[test]
    fn gaps_wider_than_the_window_are_skipped() {
        let mut reorderer = Reorderer::new(2);
        assert_eq!(reorderer.push(env(1)), vec![1]);
        assert!(reorderer.push(env(3)).is_empty());
        assert!(reorderer.push(env(4)).is_empty());
        assert_eq!(reorderer.push(env(5)), vec![3, 4, 5]);
        assert_eq!(reorderer.skipped(), 1);
        assert_eq!(reorderer.expected(), 6);
        // the missing message arriving late is now stale
        assert!(reorderer.push(env(2)).is_empty());
    }

    #[test]
    fn zero_window_skips_gaps_immediately() {
        let mut reorderer = Reorderer::new(0);
        assert_eq!(reorderer.push(env(1)), vec![1]);
        assert_eq!(reorderer.push(env(3)), vec![3]);
        assert_eq!(reorderer.skipped(), 1);
    }

    #[test]
    fn duplicated_first_message_is_dropped() {
        let mut reorderer = Reorderer::new(4);
        assert_eq!(reorderer.push(env(1)), vec![1]);
        assert_eq!(reorderer.push(env(2)), vec![2]);
        assert!(reorderer.push(env(1)).is_empty());
        assert_eq!(reorderer.expected(), 3);
        assert_eq!(reorderer.push(env(3)), vec![3]);
        assert_eq!(reorderer.dropped(), 1);
    }

    #[test]
    fn duplicated_first_message_before_anything_else_is_dropped() {
        let mut reorderer = Reorderer::new(4);
        assert!(reorderer.push(env(2)).is_empty());
        assert_eq!(reorderer.push(env(1)), vec![1, 2]);
        assert!(reorderer.push(env(1)).is_empty());
        assert_eq!(reorderer.push(env(3)), vec![3]);
    }

    #[test]
    fn new_epoch_resets_the_receiver() {
        let mut reorderer = Reorderer::new(4);
        assert_eq!(reorderer.push(env(1)), vec![1]);
        assert_eq!(reorderer.push(env(2)), vec![2]);
        assert!(reorderer.push(env(5)).is_empty());
        assert_eq!(reorderer.buffered(), 1);

        assert!(reorderer.push(env_in(EPOCH + 1, 2)).is_empty());
        assert_eq!(reorderer.epoch(), Some(EPOCH + 1));
        assert_eq!(reorderer.buffered(), 1);
        assert_eq!(reorderer.push(env_in(EPOCH + 1, 1)), vec![1, 2]);
    }

    #[test]
    fn retired_epochs_stay_dropped() {
        let mut reorderer = Reorderer::new(4);
        assert_eq!(reorderer.push(env(1)), vec![1]);
        assert_eq!(reorderer.push(env_in(EPOCH + 1, 1)), vec![1]);
        assert!(reorderer.push(env(2)).is_empty());
        assert!(reorderer.push(env(1)).is_empty());
        assert_eq!(reorderer.epoch(), Some(EPOCH + 1));
        assert_eq!(reorderer.push(env_in(EPOCH + 1, 2)), vec![2]);
        assert_eq!(reorderer.dropped(), 2);
    }
}
