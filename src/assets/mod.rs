//! Asset Loading
//!
//! Avatars and sign clips are model files decoded into a [`Prefab`]. Loading
//! is asynchronous from the player's point of view: a loader accepts a
//! request, hands back a [`LoadTicket`], and later reports progress and the
//! outcome as [`LoadEvent`]s when polled. The player polls on its own thread,
//! so every callback it acts on runs there.
//!
//! - [`GltfLoader`]: reads `.glb`/`.gltf` files on worker threads
//! - [`MemoryLoader`]: serves prefabs registered in memory; requests can be
//!   held back and released later to stage races

pub mod loaders;
mod memory;
mod prefab;

pub use loaders::GltfLoader;
pub use memory::MemoryLoader;
pub use prefab::{Prefab, PrefabNode};

use crate::errors::AssetError;

/// Identifies one load request. Never reused by a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

#[derive(Debug)]
pub enum LoadEvent {
    /// Informational; `total` is 0 when unknown.
    Progress {
        ticket: LoadTicket,
        loaded: u64,
        total: u64,
    },
    Loaded {
        ticket: LoadTicket,
        prefab: Box<Prefab>,
    },
    Failed {
        ticket: LoadTicket,
        error: AssetError,
    },
}

impl LoadEvent {
    #[must_use]
    pub fn ticket(&self) -> LoadTicket {
        match self {
            LoadEvent::Progress { ticket, .. }
            | LoadEvent::Loaded { ticket, .. }
            | LoadEvent::Failed { ticket, .. } => *ticket,
        }
    }
}

/// Source of model assets.
pub trait AssetLoader {
    /// Starts loading `path`. The outcome arrives later through [`poll`](Self::poll).
    fn request(&mut self, path: &str) -> LoadTicket;

    /// Abandons a request; no further events are reported for it.
    fn cancel(&mut self, _ticket: LoadTicket) {}

    /// Drains the events that became available since the last call.
    fn poll(&mut self) -> Vec<LoadEvent>;
}
