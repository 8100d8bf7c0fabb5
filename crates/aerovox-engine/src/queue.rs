//! Unbounded multi-producer multi-consumer FIFO with blocking pop.
//!
//! Backed by a crossbeam channel: `push` never blocks, `pop_blocking`
//! parks the caller until an item arrives, and each pushed item wakes at
//! most one parked consumer. Order is FIFO across all producers combined.
//!
//! The queue owns both channel ends, so it never observes disconnection;
//! shutdown is the consumer's business (the pool pushes poison items).

use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Shared FIFO of work items. Cloning yields another handle to the same
/// queue.
#[derive(Debug)]
pub struct BlockingTaskQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Clone for BlockingTaskQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T> Default for BlockingTaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BlockingTaskQueue<T> {
    /// Empty queue.
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Append `item` at the tail.
    pub fn push(&self, item: T) {
        // Cannot fail: `self.rx` keeps the channel connected.
        let _ = self.tx.send(item);
    }

    /// Remove the head, blocking while the queue is empty.
    pub fn pop_blocking(&self) -> T {
        match self.rx.recv() {
            Ok(item) => item,
            Err(_) => unreachable!("queue holds its own sender"),
        }
    }

    /// Remove the head if one is available.
    pub fn try_pop(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Items currently waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
