use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::assets::{AssetLoader, LoadEvent, LoadTicket, Prefab};
use crate::errors::AssetError;

#[derive(Default)]
struct Inner {
    assets: FxHashMap<String, Prefab>,
    failures: FxHashMap<String, AssetError>,
    held: FxHashSet<String>,
    pending: Vec<(LoadTicket, String)>,
    requests: Vec<String>,
    next_ticket: u64,
}

/// In-memory [`AssetLoader`].
///
/// Clones share state, so a test can keep one handle while the player owns
/// another. Requests for unknown paths fail with [`AssetError::NotFound`].
/// A held path stays pending until [`release`](Self::release) is called.
#[derive(Clone, Default)]
pub struct MemoryLoader {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, prefab: Prefab) {
        self.inner.lock().assets.insert(path.into(), prefab);
    }

    #[must_use]
    pub fn with(self, path: impl Into<String>, prefab: Prefab) -> Self {
        self.insert(path, prefab);
        self
    }

    /// Makes every request for `path` fail with `error`.
    pub fn fail(&self, path: impl Into<String>, error: AssetError) {
        self.inner.lock().failures.insert(path.into(), error);
    }

    /// Keeps requests for `path` pending.
    pub fn hold(&self, path: impl Into<String>) {
        self.inner.lock().held.insert(path.into());
    }

    pub fn release(&self, path: &str) {
        self.inner.lock().held.remove(path);
    }

    /// Every path requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().requests.clone()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.lock().pending.len()
    }
}

impl AssetLoader for MemoryLoader {
    fn request(&mut self, path: &str) -> LoadTicket {
        let mut inner = self.inner.lock();
        let ticket = LoadTicket(inner.next_ticket);
        inner.next_ticket += 1;
        inner.requests.push(path.to_string());
        inner.pending.push((ticket, path.to_string()));
        ticket
    }

    fn cancel(&mut self, ticket: LoadTicket) {
        self.inner.lock().pending.retain(|(t, _)| *t != ticket);
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        let mut inner = self.inner.lock();
        let (ready, still_held): (Vec<_>, Vec<_>) = std::mem::take(&mut inner.pending)
            .into_iter()
            .partition(|(_, path)| !inner.held.contains(path));
        inner.pending = still_held;

        let mut events = Vec::with_capacity(ready.len() * 2);
        for (ticket, path) in ready {
            if let Some(error) = inner.failures.get(&path) {
                events.push(LoadEvent::Failed {
                    ticket,
                    error: error.clone(),
                });
                continue;
            }
            match inner.assets.get(&path) {
                Some(prefab) => {
                    let size = prefab.nodes.len() as u64;
                    events.push(LoadEvent::Progress {
                        ticket,
                        loaded: size,
                        total: size,
                    });
                    events.push(LoadEvent::Loaded {
                        ticket,
                        prefab: Box::new(prefab.clone()),
                    });
                }
                None => events.push(LoadEvent::Failed {
                    ticket,
                    error: AssetError::NotFound(path),
                }),
            }
        }
        events
    }
}
