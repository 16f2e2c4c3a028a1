use serde::{Deserialize, Serialize};
use std::fmt;

use super::coord::BlockCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    DirtTerrain,
    TexturedDirt,
    TexturedGrass,
    TexturedStone,
    Outline,
    NpcMarker,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::DirtTerrain,
        BlockType::TexturedDirt,
        BlockType::TexturedGrass,
        BlockType::TexturedStone,
        BlockType::Outline,
        BlockType::NpcMarker,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BlockType::DirtTerrain => "dirt-terrain",
            BlockType::TexturedDirt => "textured-dirt",
            BlockType::TexturedGrass => "textured-grass",
            BlockType::TexturedStone => "textured-stone",
            BlockType::Outline => "outline",
            BlockType::NpcMarker => "npc-marker",
        }
    }

    /// Whether players may place this type by hand.
    pub fn is_placeable(&self) -> bool {
        matches!(
            self,
            BlockType::TexturedDirt | BlockType::TexturedGrass | BlockType::TexturedStone
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque handle to a material owned by the asset catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialHandle(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub coord: BlockCoord,
    pub block_type: BlockType,
    /// `None` when the catalog had no material for the type; the block still exists.
    pub material: Option<MaterialHandle>,
}

impl Block {
    pub fn new(coord: BlockCoord, block_type: BlockType, material: Option<MaterialHandle>) -> Self {
        Self {
            coord,
            block_type,
            material,
        }
    }
}
