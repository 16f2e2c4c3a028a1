use log::{debug, error, info};

use super::{GameSystem, SimulationContext, SystemKind};
use crate::world::{BlockType, WorldSnapshot};

/// Owns the world's lifetime: lays the floor at session start, tears it down at
/// exit, and keeps the follow light on the player.
#[derive(Debug, Default)]
pub struct MapSystem;

impl MapSystem {
    pub fn new() -> Self {
        Self
    }
}

impl GameSystem for MapSystem {
    fn kind(&self) -> SystemKind {
        SystemKind::Map
    }

    fn init(&mut self, ctx: &mut SimulationContext) {
        debug!("MapSystem::init() size = {}", ctx.world.size());
    }

    fn on_game_start(&mut self, ctx: &mut SimulationContext) {
        debug!("MapSystem::on_game_start()");
        let size = ctx.world.size();
        let material = ctx.assets.material(BlockType::DirtTerrain);
        ctx.world.init_terrain(size, material);
    }

    /// Map ticks before the player, so the light sits on last frame's eye position.
    fn on_main_loop(&mut self, ctx: &mut SimulationContext) {
        ctx.follow_player_with_light();
    }

    fn on_game_exit(&mut self, ctx: &mut SimulationContext) {
        debug!("MapSystem::on_game_exit()");
        if let Some(path) = ctx.config.world.snapshot.clone() {
            match ctx.world.snapshot().save(&path) {
                Ok(()) => info!("Saved world snapshot to {}", path.display()),
                Err(e) => error!("Failed to save world snapshot: {}", e),
            }
        }
        ctx.world.clear_all();
    }
}

/// Loads a snapshot into the world, for tools that want to resume a layout.
pub fn restore_snapshot(ctx: &mut SimulationContext, snapshot: &WorldSnapshot) {
    let assets = &ctx.assets;
    ctx.world.restore(snapshot, |t| assets.material(t));
}
