use log::{debug, warn};

use super::{GameSystem, SimulationContext, SystemKind};
use crate::world::{BlockCoord, BlockType};

/// A requested edit to the world, applied by [`BlockSystem`] on its next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCommand {
    Place { coord: BlockCoord, block_type: BlockType },
    Remove { coord: BlockCoord },
}

/// Applies queued player edits. Placement is checked against world bounds and
/// occupancy here, since the world itself accepts any coordinate.
#[derive(Debug, Default)]
pub struct BlockSystem {
    placed: u64,
    removed: u64,
}

impl BlockSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placed(&self) -> u64 {
        self.placed
    }

    pub fn removed(&self) -> u64 {
        self.removed
    }

    fn apply(&mut self, ctx: &mut SimulationContext, command: BlockCommand) {
        match command {
            BlockCommand::Place { coord, block_type } => {
                if !coord.within(ctx.world.size()) {
                    debug!("Rejected placement outside world at {}", coord);
                    return;
                }
                if ctx.world.is_solid(coord) {
                    debug!("Rejected placement into occupied cell {}", coord);
                    return;
                }
                let material = ctx.assets.material(block_type);
                ctx.world.add_block(coord, block_type, material);
                self.placed += 1;
                debug!("Placed block ({}) at {}", block_type, coord);
            }
            BlockCommand::Remove { coord } => {
                if ctx.world.remove_block(coord).is_some() {
                    self.removed += 1;
                    debug!("Removed block at {}", coord);
                } else {
                    warn!("No block to remove at {}", coord);
                }
            }
        }
    }
}

impl GameSystem for BlockSystem {
    fn kind(&self) -> SystemKind {
        SystemKind::Block
    }

    fn on_game_start(&mut self, ctx: &mut SimulationContext) {
        debug!("BlockSystem::on_game_start()");
        ctx.block_commands.clear();
    }

    fn on_main_loop(&mut self, ctx: &mut SimulationContext) {
        let commands = std::mem::take(&mut ctx.block_commands);
        for command in commands {
            self.apply(ctx, command);
        }
    }

    fn on_game_exit(&mut self, ctx: &mut SimulationContext) {
        debug!("BlockSystem::on_game_exit() placed = {}, removed = {}", self.placed, self.removed);
        ctx.block_commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn ctx() -> SimulationContext {
        let mut ctx = SimulationContext::new(EngineConfig::default());
        ctx.assets.load_builtin();
        ctx
    }

    #[test]
    fn test_place_then_remove() {
        let mut ctx = ctx();
        let mut blocks = BlockSystem::new();
        let coord = BlockCoord::new(2, 1, 3);

        ctx.block_commands.push(BlockCommand::Place {
            coord,
            block_type: BlockType::TexturedDirt,
        });
        blocks.on_main_loop(&mut ctx);
        let placed = ctx.world.get_block(coord).unwrap();
        assert_eq!(placed.block_type, BlockType::TexturedDirt);
        assert!(placed.material.is_some());
        assert!(ctx.block_commands.is_empty());

        ctx.block_commands.push(BlockCommand::Remove { coord });
        blocks.on_main_loop(&mut ctx);
        assert!(ctx.world.get_block(coord).is_none());
        assert_eq!((blocks.placed(), blocks.removed()), (1, 1));
    }

    #[test]
    fn test_placement_is_validated() {
        let mut ctx = ctx();
        let mut blocks = BlockSystem::new();
        ctx.world.add_block(BlockCoord::new(1, 1, 1), BlockType::TexturedStone, None);

        ctx.block_commands.extend([
            BlockCommand::Place {
                coord: BlockCoord::new(16, 1, 1),
                block_type: BlockType::TexturedDirt,
            },
            BlockCommand::Place {
                coord: BlockCoord::new(1, -1, 1),
                block_type: BlockType::TexturedDirt,
            },
            BlockCommand::Place {
                coord: BlockCoord::new(1, 1, 1),
                block_type: BlockType::TexturedDirt,
            },
        ]);
        blocks.on_main_loop(&mut ctx);

        assert_eq!(ctx.world.len(), 1);
        assert_eq!(
            ctx.world.get_block(BlockCoord::new(1, 1, 1)).unwrap().block_type,
            BlockType::TexturedStone
        );
        assert_eq!(blocks.placed(), 0);
    }

    #[test]
    fn test_missing_material_still_places() {
        let mut ctx = SimulationContext::new(EngineConfig::default());
        let mut blocks = BlockSystem::new();
        let coord = BlockCoord::new(4, 1, 4);

        ctx.block_commands.push(BlockCommand::Place {
            coord,
            block_type: BlockType::TexturedGrass,
        });
        blocks.on_main_loop(&mut ctx);
        assert_eq!(ctx.world.get_block(coord).unwrap().material, None);
    }
}
