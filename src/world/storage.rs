use log::debug;
use std::collections::HashMap;

use super::block::{Block, BlockType, MaterialHandle};
use super::coord::BlockCoord;

/// Receives block lifecycle notifications so a presentation layer can mirror the world.
pub trait SceneObserver {
    fn attach(&mut self, block: &Block);
    fn detach(&mut self, block: &Block);
}

/// Observer that ignores every notification.
#[derive(Debug, Default)]
pub struct NullScene;

impl SceneObserver for NullScene {
    fn attach(&mut self, _block: &Block) {}
    fn detach(&mut self, _block: &Block) {}
}

/// Sparse block storage for a cubic world of edge length `size`.
///
/// A coordinate with no entry is air. Nothing here checks bounds; callers that
/// place blocks on behalf of a player validate against [`VoxelWorld::size`] first.
pub struct VoxelWorld {
    blocks: HashMap<BlockCoord, Block>,
    size: i32,
    scene: Box<dyn SceneObserver>,
}

impl VoxelWorld {
    pub fn new(size: i32) -> Self {
        Self::with_scene(size, Box::new(NullScene))
    }

    pub fn with_scene(size: i32, scene: Box<dyn SceneObserver>) -> Self {
        Self {
            blocks: HashMap::new(),
            size,
            scene,
        }
    }

    pub fn set_scene(&mut self, scene: Box<dyn SceneObserver>) {
        self.scene = scene;
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Inserts a block, replacing whatever occupied `coord`. Returns the replaced block.
    pub fn add_block(
        &mut self,
        coord: BlockCoord,
        block_type: BlockType,
        material: Option<MaterialHandle>,
    ) -> Option<Block> {
        let block = Block::new(coord, block_type, material);
        self.scene.attach(&block);
        let previous = self.blocks.insert(coord, block);
        if let Some(old) = &previous {
            self.scene.detach(old);
        }
        previous
    }

    pub fn get_block(&self, coord: BlockCoord) -> Option<&Block> {
        self.blocks.get(&coord)
    }

    pub fn is_solid(&self, coord: BlockCoord) -> bool {
        self.get_block(coord).is_some()
    }

    /// Removes the block at `coord`. Removing air is a no-op.
    pub fn remove_block(&mut self, coord: BlockCoord) -> Option<Block> {
        let removed = self.blocks.remove(&coord)?;
        self.scene.detach(&removed);
        Some(removed)
    }

    pub fn clear_all(&mut self) {
        for (_, block) in self.blocks.drain() {
            self.scene.detach(&block);
        }
    }

    /// Lays a flat `dirt-terrain` floor over every `(x, 0, z)` with `x, z` in `[0, size)`.
    pub fn init_terrain(&mut self, size: i32, material: Option<MaterialHandle>) {
        debug!("VoxelWorld::init_terrain({size})");
        for x in 0..size {
            for z in 0..size {
                self.add_block(BlockCoord::new(x, 0, z), BlockType::DirtTerrain, material);
            }
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }
}

impl std::fmt::Debug for VoxelWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelWorld")
            .field("size", &self.size)
            .field("blocks", &self.blocks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct SceneLog {
        events: Rc<RefCell<Vec<(&'static str, String)>>>,
    }

    impl SceneObserver for SceneLog {
        fn attach(&mut self, block: &Block) {
            self.events.borrow_mut().push(("attach", block.coord.key()));
        }

        fn detach(&mut self, block: &Block) {
            self.events.borrow_mut().push(("detach", block.coord.key()));
        }
    }

    #[test]
    fn test_add_then_get_returns_type() {
        let mut world = VoxelWorld::new(16);
        let coord = BlockCoord::new(4, 2, 9);
        world.add_block(coord, BlockType::TexturedStone, Some(MaterialHandle(3)));

        let block = world.get_block(coord).unwrap();
        assert_eq!(block.block_type, BlockType::TexturedStone);
        assert_eq!(block.material, Some(MaterialHandle(3)));
    }

    #[test]
    fn test_at_most_one_block_per_coord() {
        let mut world = VoxelWorld::new(16);
        let coord = BlockCoord::new(1, 1, 1);
        world.add_block(coord, BlockType::TexturedDirt, None);
        let replaced = world.add_block(coord, BlockType::TexturedGrass, None);

        assert_eq!(replaced.map(|b| b.block_type), Some(BlockType::TexturedDirt));
        assert_eq!(world.len(), 1);
        assert_eq!(world.get_block(coord).unwrap().block_type, BlockType::TexturedGrass);
    }

    #[test]
    fn test_place_and_remove_scenario() {
        let mut world = VoxelWorld::new(16);
        let coord = BlockCoord::new(2, 1, 3);
        world.add_block(coord, BlockType::TexturedDirt, Some(MaterialHandle(1)));
        assert_eq!(world.get_block(coord).unwrap().block_type, BlockType::TexturedDirt);

        world.remove_block(coord);
        assert!(world.get_block(coord).is_none());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut world = VoxelWorld::with_scene(16, Box::new(SceneLog { events: events.clone() }));

        assert!(world.remove_block(BlockCoord::new(5, 5, 5)).is_none());
        assert!(world.remove_block(BlockCoord::new(5, 5, 5)).is_none());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_lookup_outside_world_is_air() {
        let world = VoxelWorld::new(16);
        assert!(world.get_block(BlockCoord::new(-1, -1, -1)).is_none());
        assert!(world.get_block(BlockCoord::new(i32::MAX, 0, i32::MIN)).is_none());
    }

    #[test]
    fn test_init_terrain_and_clear() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut world = VoxelWorld::with_scene(16, Box::new(SceneLog { events: events.clone() }));

        world.init_terrain(16, None);
        assert_eq!(world.len(), 256);
        assert!(world
            .blocks()
            .all(|b| b.coord.y() == 0 && b.block_type == BlockType::DirtTerrain));
        assert!(world.is_solid(BlockCoord::new(15, 0, 15)));
        assert!(!world.is_solid(BlockCoord::new(16, 0, 15)));

        world.clear_all();
        assert!(world.is_empty());
        let detached = events.borrow().iter().filter(|(kind, _)| *kind == "detach").count();
        assert_eq!(detached, 256);
    }

    #[test]
    fn test_scene_sees_replacement() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut world = VoxelWorld::with_scene(16, Box::new(SceneLog { events: events.clone() }));
        let coord = BlockCoord::new(0, 1, 0);

        world.add_block(coord, BlockType::TexturedDirt, None);
        world.add_block(coord, BlockType::TexturedStone, None);

        assert_eq!(
            *events.borrow(),
            vec![
                ("attach", "0,1,0".to_string()),
                ("attach", "0,1,0".to_string()),
                ("detach", "0,1,0".to_string()),
            ]
        );
    }
}
