use std::sync::Arc;

use tokio::sync::watch;

/// Cancels the running deposit attempt from outside the controller, e.g. on wallet disconnect.
///
/// One token lives as long as its controller. A trip stays set until the
/// next attempt re-arms it, so clones taken at any point keep working.
#[derive(Debug, Clone)]
pub struct AbortToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl AbortToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    /// Clears a previous trip on every clone.
    pub fn rearm(&self) {
        self.tx.send_replace(false);
    }

    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`AbortToken::abort`] has been called on any clone.
    pub async fn aborted(&self) {
        let mut rx = self.rx.clone();
        while !*rx.borrow_and_update() {
            // the sender lives as long as any clone of this token
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for AbortToken {
    fn default() -> Self {
        Self::new()
    }
}
