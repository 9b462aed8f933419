//! Indexed request queue
//!
//! Append-only log with a head pointer. Entries below the head have been
//! folded into a proven block. The head moves only through `fold`.

use crate::error::{ExchangeError, ExchangeResult};
use shared_types::Timestamp;
use std::ops::Range;

/// A request that waits in a queue until a block folds it.
pub trait QueuedRequest {
    fn timestamp(&self) -> Timestamp;

    /// Mark the request consumed by block processing.
    fn mark_folded(&mut self);
}

/// Ordered, indexed log of requests
#[derive(Clone, Debug)]
pub struct RequestQueue<R> {
    entries: Vec<R>,
    head: u64,
}

impl<R: QueuedRequest> RequestQueue<R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            head: 0,
        }
    }

    /// Append a request built from its index. Returns the index.
    pub fn push(&mut self, build: impl FnOnce(u64) -> R) -> u64 {
        let index = self.entries.len() as u64;
        self.entries.push(build(index));
        index
    }

    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the oldest request not yet folded.
    pub fn head(&self) -> u64 {
        self.head
    }

    /// Requests not yet folded into a block.
    pub fn pending(&self) -> u64 {
        self.len() - self.head
    }

    pub fn get(&self, index: u64) -> Option<&R> {
        self.entries.get(index as usize)
    }

    pub(crate) fn get_mut(&mut self, index: u64) -> Option<&mut R> {
        self.entries.get_mut(index as usize)
    }

    pub fn is_folded(&self, index: u64) -> bool {
        index < self.head
    }

    /// Timestamp of the oldest unprocessed request, `None` when drained.
    pub fn oldest_pending_timestamp(&self) -> Option<Timestamp> {
        self.timestamp_after_fold(0)
    }

    /// Oldest unprocessed timestamp once `count` more requests are folded.
    pub fn timestamp_after_fold(&self, count: u64) -> Option<Timestamp> {
        let index = self.head.checked_add(count)?;
        self.get(index).map(QueuedRequest::timestamp)
    }

    /// Mark the oldest `count` pending requests folded and advance the head.
    ///
    /// Fails without changes when fewer than `count` requests are pending.
    pub fn fold(&mut self, count: u64) -> ExchangeResult<Range<u64>> {
        if count > self.pending() {
            return Err(ExchangeError::InvalidBlock {
                block_index: 0,
                reason: format!("cannot fold {} of {} pending requests", count, self.pending()),
            });
        }

        let range = self.head..self.head + count;
        for entry in &mut self.entries[range.start as usize..range.end as usize] {
            entry.mark_folded();
        }
        self.head = range.end;
        Ok(range)
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.entries.iter()
    }
}

impl<R: QueuedRequest> Default for RequestQueue<R> {
    fn default() -> Self {
        Self::new()
    }
}
