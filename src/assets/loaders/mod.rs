mod gltf;

pub use self::gltf::{GltfLoader, prefab_from_document};
