use log::{debug, info};
use std::time::{Duration, Instant};

use super::{BlockCommand, GameSystem, SimulationContext, SystemKind};
use crate::player::PointerButton;
use crate::utils::ray::{Ray, RayHit};
use crate::world::{BlockCoord, BlockType};

/// Block targeting and editing from pointer input.
///
/// Each frame a ray from the player's eye along the eased look direction picks
/// the highlighted block. Primary click schedules that block's removal after
/// the break delay; secondary click places the selected type against the hit
/// face. Clicks are ignored while a break is pending.
#[derive(Debug)]
pub struct ControlSystem {
    selected: BlockType,
    pending_break: Option<(BlockCoord, Instant)>,
}

impl Default for ControlSystem {
    fn default() -> Self {
        Self {
            selected: BlockType::TexturedDirt,
            pending_break: None,
        }
    }
}

impl ControlSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> BlockType {
        self.selected
    }

    pub fn is_breaking(&self) -> bool {
        self.pending_break.is_some()
    }

    fn set_block_type(&mut self, block_type: BlockType) {
        if !block_type.is_placeable() {
            info!("Ignoring selection of non-placeable block type {}", block_type);
            return;
        }
        self.selected = block_type;
        info!("Block type changed to: {}", block_type);
    }

    fn target(ctx: &SimulationContext) -> Option<RayHit> {
        let view = ctx.player_view;
        let ray = Ray::new(view.eye, view.look.look_direction());
        ray.cast_voxels(ctx.config.control.reach, |cell| {
            ctx.world.is_solid(BlockCoord::from(cell))
        })
    }

    fn handle_click(&mut self, ctx: &mut SimulationContext, button: PointerButton, hit: Option<RayHit>) {
        if self.pending_break.is_some() {
            return;
        }
        let Some(hit) = hit else {
            debug!("No block hit by ray");
            return;
        };
        debug!("Ray hit block at {}", BlockCoord::from(hit.cell));

        match button {
            PointerButton::Primary => {
                let delay = Duration::from_millis(ctx.config.control.break_delay_ms);
                self.pending_break = Some((BlockCoord::from(hit.cell), ctx.now + delay));
            }
            PointerButton::Secondary => {
                if hit.normal == glam::IVec3::ZERO {
                    return;
                }
                let coord = BlockCoord::from(hit.adjacent());
                if ctx.world.is_solid(coord) {
                    return;
                }
                ctx.block_commands.push(BlockCommand::Place {
                    coord,
                    block_type: self.selected,
                });
            }
            PointerButton::Other(_) => {}
        }
    }
}

impl GameSystem for ControlSystem {
    fn kind(&self) -> SystemKind {
        SystemKind::Control
    }

    fn init(&mut self, ctx: &mut SimulationContext) {
        debug!("ControlSystem::init()");
        self.selected = ctx.config.control.default_block;
    }

    fn on_game_start(&mut self, _ctx: &mut SimulationContext) {
        debug!("ControlSystem::on_game_start()");
    }

    fn on_main_loop(&mut self, ctx: &mut SimulationContext) {
        if let Some(block_type) = ctx.input.take_selection() {
            self.set_block_type(block_type);
        }

        if let Some((coord, deadline)) = self.pending_break {
            if ctx.now >= deadline {
                ctx.block_commands.push(BlockCommand::Remove { coord });
                self.pending_break = None;
            }
        }

        let hit = Self::target(ctx);
        ctx.highlight = hit.map(|h| BlockCoord::from(h.cell));

        for button in ctx.input.take_clicks() {
            self.handle_click(ctx, button, hit);
        }
    }

    fn on_game_exit(&mut self, ctx: &mut SimulationContext) {
        debug!("ControlSystem::on_game_exit()");
        ctx.input.clear();
        ctx.highlight = None;
        self.pending_break = None;
    }
}
