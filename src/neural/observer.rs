//! Output listeners notified after every forward pass.

use std::sync::mpsc::{self, Receiver, Sender};

/// Registered listeners for feed-forward results.
///
/// Delivery is fire-and-forget: a listener whose receiver has been dropped
/// is pruned on the next notification and never fails the caller.
/// Clones start with no listeners, so copies and offspring are silent until
/// someone subscribes to them.
#[derive(Debug, Default)]
pub struct Observers {
    senders: Vec<Sender<Vec<f32>>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener and return its receiving end
    pub fn subscribe(&mut self) -> Receiver<Vec<f32>> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    /// Send `outputs` to every live listener
    pub fn notify(&mut self, outputs: &[f32]) {
        let before = self.senders.len();
        self.senders.retain(|tx| tx.send(outputs.to_vec()).is_ok());

        let dropped = before - self.senders.len();
        if dropped > 0 {
            log::debug!("Pruned {} disconnected output listener(s)", dropped);
        }
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

impl Clone for Observers {
    fn clone(&self) -> Self {
        Self::new()
    }
}
