//! Single-assignment result cell.
//!
//! Several racing signals (a response, an error, a timer) may each try to
//! settle the same cell. Only the first settlement is observed; every later
//! one is dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Create a connected settler/receiver pair.
pub fn settle_once<T>() -> (SettleOnce<T>, Settled<T>) {
    let (sender, receiver) = oneshot::channel();
    (
        SettleOnce {
            slot: Arc::new(Mutex::new(Some(sender))),
        },
        Settled {
            receiver,
        },
    )
}

/// Cloneable settling side of the cell.
pub struct SettleOnce<T> {
    slot: Arc<Mutex<Option<oneshot::Sender<T>>>>,
}

impl<T> Clone for SettleOnce<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> SettleOnce<T> {
    /// Try to settle the cell with `value`.
    ///
    /// Returns `true` for the single call that won; every other call returns
    /// `false` and its value is discarded.
    pub fn settle(&self, value: T) -> bool {
        let Some(sender) = self.slot.lock().take() else {
            return false;
        };
        // The receiver may already be gone; this call still won the cell.
        let _ = sender.send(value);
        true
    }

    /// Whether some call has already won.
    pub fn is_settled(&self) -> bool {
        self.slot.lock().is_none()
    }
}

/// Receiving side of the cell.
pub struct Settled<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T> Settled<T> {
    /// Wait for the winning value. `None` if every settler was dropped
    /// without settling.
    pub async fn wait(self) -> Option<T> {
        self.receiver.await.ok()
    }
}
