use std::sync::Arc;
use tokio::sync::watch;

/// A value that is resolved at most once and can be awaited by any number of
/// tasks, before or after resolution.
///
/// Used for DOM readiness and the readiness signals of in-memory sources.
#[derive(Debug)]
pub struct OnceSignal<T> {
    tx: Arc<watch::Sender<Option<T>>>,
}

impl<T> Clone for OnceSignal<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone> Default for OnceSignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> OnceSignal<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn resolved(value: T) -> Self {
        let signal = Self::new();
        signal.resolve(value);
        signal
    }

    /// Resolve the signal. Later calls are ignored and return false.
    pub fn resolve(&self, value: T) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
            true
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub async fn wait(&self) -> T {
        let mut rx = self.tx.subscribe();
        let resolved = match rx.wait_for(Option::is_some).await {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        match resolved {
            Some(value) => value,
            // The sender lives as long as `self`, so the channel cannot close here.
            None => std::future::pending().await,
        }
    }
}
