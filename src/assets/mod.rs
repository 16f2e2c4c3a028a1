use log::{debug, error};
use std::collections::HashMap;

use crate::world::{BlockType, MaterialHandle};

/// Material table per block type.
///
/// Textures and GPU resources live with the presentation layer; the simulation
/// only hands out opaque handles and tracks whether loading has finished.
#[derive(Debug, Default)]
pub struct AssetCatalog {
    materials: HashMap<BlockType, MaterialHandle>,
    next_handle: u32,
    loaded: bool,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a material for `block_type`, returning its handle. Re-registering keeps the old handle.
    pub fn register(&mut self, block_type: BlockType) -> MaterialHandle {
        if let Some(&handle) = self.materials.get(&block_type) {
            return handle;
        }
        let handle = MaterialHandle(self.next_handle);
        self.next_handle += 1;
        self.materials.insert(block_type, handle);
        debug!("Registered material {:?} for {}", handle, block_type);
        handle
    }

    /// Registers every built-in block type and marks the catalog ready.
    pub fn load_builtin(&mut self) {
        for block_type in BlockType::ALL {
            self.register(block_type);
        }
        self.mark_loaded();
    }

    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Material for `block_type`. Unknown types are logged and yield `None`; callers carry on without one.
    pub fn material(&self, block_type: BlockType) -> Option<MaterialHandle> {
        let handle = self.materials.get(&block_type).copied();
        if handle.is_none() {
            error!("No such material: {}", block_type);
        }
        handle
    }
}
