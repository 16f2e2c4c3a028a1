use glam::Vec3;
use rand::Rng;

use super::{NPC_EDGE, PHYSICS_DT};
use crate::config::NpcTuning;
use crate::world::{BlockCoord, VoxelWorld};

/// Layer NPCs walk in; a block there stops them.
const NPC_LAYER: i32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NpcStep {
    pub rerolled: bool,
    pub moved: bool,
}

/// Seconds until the next velocity re-roll, uniform in the configured range.
pub fn draw_timer<R: Rng>(rng: &mut R, tuning: &NpcTuning) -> f32 {
    let (lo, hi) = if tuning.timer_min <= tuning.timer_max {
        (tuning.timer_min, tuning.timer_max)
    } else {
        (tuning.timer_max, tuning.timer_min)
    };
    rng.gen_range(lo..=hi)
}

/// Planar velocity with x and z uniform in `[-speed, speed]`.
pub fn draw_velocity<R: Rng>(rng: &mut R, speed: f32) -> Vec3 {
    let speed = speed.abs();
    Vec3::new(
        rng.gen_range(-speed..=speed),
        0.0,
        rng.gen_range(-speed..=speed),
    )
}

/// Whether an NPC may stand at planar `(x, z)`: strictly inside the edge band and not inside a block.
pub fn npc_can_move_to(world: &VoxelWorld, x: f32, z: f32) -> bool {
    let limit = world.size() as f32 - NPC_EDGE;
    if x < NPC_EDGE || x >= limit || z < NPC_EDGE || z >= limit {
        return false;
    }
    !world.is_solid(BlockCoord::new(x.floor() as i32, NPC_LAYER, z.floor() as i32))
}

/// Advances one wandering NPC by a fixed tick.
///
/// The timer always drops by [`PHYSICS_DT`]; on expiry a fresh velocity and
/// timer are drawn. A rejected move leaves the NPC where it was until the next
/// re-roll.
pub fn step_npc<R: Rng>(
    world: &VoxelWorld,
    position: &mut Vec3,
    velocity: &mut Vec3,
    move_timer: &mut f32,
    tuning: &NpcTuning,
    rng: &mut R,
) -> NpcStep {
    let mut step = NpcStep::default();

    *move_timer -= PHYSICS_DT;
    if *move_timer <= 0.0 {
        *velocity = draw_velocity(rng, tuning.speed);
        *move_timer = draw_timer(rng, tuning);
        step.rerolled = true;
    }

    let candidate = *position + *velocity;
    if npc_can_move_to(world, candidate.x, candidate.z) {
        let limit = world.size() as f32 - NPC_EDGE;
        position.x = candidate.x.clamp(NPC_EDGE, limit);
        position.z = candidate.z.clamp(NPC_EDGE, limit);
        step.moved = true;
    }

    step
}
