use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::block::{BlockType, MaterialHandle};
use super::coord::BlockCoord;
use super::storage::VoxelWorld;
use crate::utils::error::WorldError;

/// Block layout keyed by the `"x,y,z"` coordinate form, sorted for stable output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub size: i32,
    pub blocks: BTreeMap<BlockCoord, BlockType>,
}

impl WorldSnapshot {
    pub fn save(&self, path: &Path) -> Result<(), WorldError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, WorldError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl VoxelWorld {
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            size: self.size(),
            blocks: self.blocks().map(|b| (b.coord, b.block_type)).collect(),
        }
    }

    /// Replaces the current layout with `snapshot`, resolving materials per block type.
    pub fn restore<F>(&mut self, snapshot: &WorldSnapshot, material_for: F)
    where
        F: Fn(BlockType) -> Option<MaterialHandle>,
    {
        self.clear_all();
        for (&coord, &block_type) in &snapshot.blocks {
            self.add_block(coord, block_type, material_for(block_type));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_snapshot_uses_coordinate_keys() {
        let mut world = VoxelWorld::new(16);
        world.add_block(BlockCoord::new(2, 1, 3), BlockType::TexturedDirt, None);
        world.add_block(BlockCoord::new(-1, 0, 0), BlockType::TexturedStone, None);

        let json = serde_json::to_value(world.snapshot()).unwrap();
        assert_eq!(json["blocks"]["2,1,3"], "textured-dirt");
        assert_eq!(json["blocks"]["-1,0,0"], "textured-stone");
        assert_eq!(json["size"], 16);
    }

    #[test]
    fn test_save_load_restore() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("worlds").join("last.json");

        let mut world = VoxelWorld::new(16);
        world.init_terrain(4, None);
        world.add_block(BlockCoord::new(1, 1, 1), BlockType::TexturedGrass, None);
        world.snapshot().save(&path).unwrap();

        let loaded = WorldSnapshot::load(&path).unwrap();
        let mut restored = VoxelWorld::new(loaded.size);
        restored.add_block(BlockCoord::new(9, 9, 9), BlockType::Outline, None);
        restored.restore(&loaded, |_| Some(MaterialHandle(7)));

        assert_eq!(restored.len(), 17);
        assert!(restored.get_block(BlockCoord::new(9, 9, 9)).is_none());
        let grass = restored.get_block(BlockCoord::new(1, 1, 1)).unwrap();
        assert_eq!(grass.block_type, BlockType::TexturedGrass);
        assert_eq!(grass.material, Some(MaterialHandle(7)));
    }

    #[test]
    fn test_bad_key_in_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"size":16,"blocks":{"1;2;3":"textured-dirt"}}"#).unwrap();

        assert!(matches!(WorldSnapshot::load(&path), Err(WorldError::Json(_))));
    }
}
