//! Subsystems driven by the scheduler through a shared lifecycle.
//!
//! Every subsystem sees the same [`SimulationContext`], built once at startup
//! and passed by `&mut` into each hook. Nothing here is global.

pub mod block;
pub mod control;
pub mod map;
pub mod npc;
pub mod player;
pub mod ui;

pub use block::{BlockCommand, BlockSystem};
pub use control::ControlSystem;
pub use map::MapSystem;
pub use npc::NpcSystem;
pub use player::PlayerSystem;
pub use ui::{HudState, Screen, UiSystem};

use glam::Vec3;
use std::time::Instant;

use crate::assets::AssetCatalog;
use crate::config::EngineConfig;
use crate::entity::{EntityAllocator, Rotation};
use crate::player::InputState;
use crate::world::{BlockCoord, VoxelWorld};

/// Which slot a subsystem occupies in the per-phase call orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKind {
    Ui,
    Map,
    Block,
    Npc,
    Player,
    Control,
}

/// Lifecycle hooks. All default to no-ops.
pub trait GameSystem {
    fn kind(&self) -> SystemKind;

    /// Once at process start.
    fn init(&mut self, _ctx: &mut SimulationContext) {}

    fn on_game_start(&mut self, _ctx: &mut SimulationContext) {}

    /// Once per frame while a session runs.
    fn on_main_loop(&mut self, _ctx: &mut SimulationContext) {}

    fn on_game_exit(&mut self, _ctx: &mut SimulationContext) {}
}

/// Where the player is and where they look, as of the last player tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerView {
    pub eye: Vec3,
    pub look: Rotation,
}

/// Offset of the follow light above the player's eye.
pub const LIGHT_OFFSET: Vec3 = Vec3::new(0.0, 0.5, 0.0);

/// Shared simulation state.
pub struct SimulationContext {
    pub config: EngineConfig,
    pub world: VoxelWorld,
    pub assets: AssetCatalog,
    pub input: InputState,
    pub entities: EntityAllocator,
    pub running: bool,
    /// Frame timestamp; systems schedule against this rather than reading the clock.
    pub now: Instant,
    pub player_view: PlayerView,
    pub npc_positions: Vec<Vec3>,
    pub light_position: Vec3,
    pub highlight: Option<BlockCoord>,
    pub block_commands: Vec<BlockCommand>,
    pub hud: HudState,
}

impl SimulationContext {
    pub fn new(config: EngineConfig) -> Self {
        let world = VoxelWorld::new(config.world.size);
        Self {
            config,
            world,
            assets: AssetCatalog::new(),
            input: InputState::new(),
            entities: EntityAllocator::new(),
            running: false,
            now: Instant::now(),
            player_view: PlayerView::default(),
            npc_positions: Vec::new(),
            light_position: Vec3::ZERO,
            highlight: None,
            block_commands: Vec::new(),
            hud: HudState::default(),
        }
    }

    pub fn follow_player_with_light(&mut self) {
        self.light_position = self.player_view.eye + LIGHT_OFFSET;
    }
}

impl std::fmt::Debug for SimulationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationContext")
            .field("world", &self.world)
            .field("running", &self.running)
            .field("player_view", &self.player_view)
            .field("npcs", &self.npc_positions.len())
            .finish()
    }
}
