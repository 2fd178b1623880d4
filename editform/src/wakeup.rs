//! Re-render signal for hosts that draw validation messages.
//!
//! An [`EditContext`](crate::EditContext) sends a wakeup every time its
//! validation state changes. A host render loop waits on the receiver and
//! redraws the form once per batch of signals.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

const CAPACITY: usize = 16;

/// Sender half of the wakeup channel.
#[derive(Clone, Debug)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
}

impl WakeupSender {
    /// Send a wakeup signal.
    ///
    /// Never blocks. A full buffer already guarantees a pending redraw, and
    /// a dropped receiver means the host has gone away.
    pub fn send(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Receiver half of the wakeup channel.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    /// Wait for a wakeup signal.
    ///
    /// Returns `None` once every sender has been dropped.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Drain all pending wakeup signals, returning how many were dropped.
    ///
    /// Several state changes in a row collapse into a single redraw.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while self.rx.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}

/// Create a new wakeup channel pair.
pub fn channel() -> (WakeupSender, WakeupReceiver) {
    let (tx, rx) = mpsc::channel(CAPACITY);
    (WakeupSender { tx }, WakeupReceiver { rx })
}

/// Slot holding the sender of an edit context, installed by the host.
#[derive(Debug, Default, Clone)]
pub(crate) struct WakeupHandle {
    inner: Arc<Mutex<Option<WakeupSender>>>,
}

impl WakeupHandle {
    pub(crate) fn install(&self, sender: WakeupSender) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(sender);
        }
    }

    pub(crate) fn send(&self) {
        if let Ok(guard) = self.inner.lock()
            && let Some(sender) = guard.as_ref()
        {
            sender.send();
        }
    }
}
