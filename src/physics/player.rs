use glam::{Quat, Vec3};
use log::{debug, trace};

use super::{FEET_EPSILON, FLOOR_MARGIN};
use crate::config::PlayerTuning;
use crate::entity::Rotation;
use crate::player::MovementIntent;
use crate::world::{BlockCoord, VoxelWorld};

/// What happened to the body during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    /// Resting on a block or the world floor after vertical resolution.
    pub grounded: bool,
    pub jumped: bool,
    /// Horizontal displacement applied.
    pub moved: bool,
    /// Horizontal displacement requested but rejected by a collision.
    pub blocked: bool,
}

/// Advances the player body by one tick.
///
/// `position.y` is eye height: the feet sit at `y - height`. Vertical motion is
/// resolved first, then a jump may be started, then the planar intent is
/// applied as a single all-or-nothing move. Horizontal direction follows
/// `target_yaw` so movement never lags the smoothed camera.
pub fn resolve_player(
    world: &VoxelWorld,
    position: &mut Vec3,
    velocity: &mut Vec3,
    intent: MovementIntent,
    target_yaw: f32,
    tuning: &PlayerTuning,
) -> PlayerStep {
    let h = tuning.height;
    let mut step = PlayerStep::default();

    velocity.y += tuning.gravity;
    let mut candidate = *position + *velocity;

    let feet = (candidate.y - h).floor() as i32;
    let column_x = candidate.x.floor() as i32;
    let column_z = candidate.z.floor() as i32;
    let block_below = world.is_solid(BlockCoord::new(column_x, feet, column_z));

    if block_below {
        candidate.y = feet as f32 + h + 1.0;
        velocity.y = 0.0;
        step.grounded = true;
        trace!("Standing on block, y = {feet}");
    } else if candidate.y <= h {
        candidate.y = h;
        velocity.y = 0.0;
        step.grounded = true;
    }
    *position = candidate;

    if intent.contains(MovementIntent::JUMP) && step.grounded {
        velocity.y = tuning.jump_strength;
        step.jumped = true;
        debug!("Player jumped");
    }

    let planar = intent.planar_direction();
    if planar != Vec3::ZERO {
        let mut offset = Quat::from_rotation_y(target_yaw) * planar;
        offset.y = 0.0;
        offset *= tuning.speed;

        let target = *position + offset;
        if can_move_to(world, target.x, position.y, target.z, h) {
            position.x = target.x;
            position.z = target.z;
            step.moved = true;
        } else {
            step.blocked = true;
            trace!(
                "Blocked at {}",
                BlockCoord::new(target.x.floor() as i32, (position.y - h).floor() as i32, target.z.floor() as i32)
            );
        }
    }

    step
}

/// Horizontal move test: the head cell must be free, and once the body is off
/// the world floor its feet cell must be free too.
fn can_move_to(world: &VoxelWorld, x: f32, y: f32, z: f32, height: f32) -> bool {
    let cx = x.floor() as i32;
    let cz = z.floor() as i32;

    if world.is_solid(BlockCoord::new(cx, y.floor() as i32, cz)) {
        return false;
    }

    if y > height + FLOOR_MARGIN {
        let feet = (y - height + FEET_EPSILON).floor() as i32;
        if world.is_solid(BlockCoord::new(cx, feet, cz)) {
            return false;
        }
    }

    true
}

/// First-order low-pass toward `target`, per axis.
pub fn smooth_rotation(current: &mut Rotation, target: Rotation, factor: f32) {
    current.pitch += (target.pitch - current.pitch) * factor;
    current.yaw += (target.yaw - current.yaw) * factor;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BlockType;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn tuning() -> PlayerTuning {
        PlayerTuning::default()
    }

    fn tick(world: &VoxelWorld, pos: &mut Vec3, vel: &mut Vec3, intent: MovementIntent) -> PlayerStep {
        resolve_player(world, pos, vel, intent, 0.0, &tuning())
    }

    #[test]
    fn test_gravity_accumulates_per_tick() {
        let world = VoxelWorld::new(16);
        let mut pos = Vec3::new(8.0, 50.0, 8.0);
        let mut vel = Vec3::ZERO;

        let mut last = vel.y;
        for _ in 0..5 {
            tick(&world, &mut pos, &mut vel, MovementIntent::empty());
            assert!(vel.y < last);
            last = vel.y;
        }
        assert_relative_eq!(vel.y, -0.05, epsilon = 1e-6);
    }

    #[test]
    fn test_landing_clamps_to_block_top() {
        let mut world = VoxelWorld::new(16);
        world.add_block(BlockCoord::new(4, 3, 4), BlockType::TexturedStone, None);
        let h = tuning().height;

        let mut pos = Vec3::new(4.5, 3.0 + h + 1.0 + 0.05, 4.5);
        let mut vel = Vec3::new(0.0, -0.1, 0.0);
        let step = tick(&world, &mut pos, &mut vel, MovementIntent::empty());

        assert!(step.grounded);
        assert_relative_eq!(pos.y, 3.0 + h + 1.0, epsilon = 1e-5);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_world_floor_holds() {
        let world = VoxelWorld::new(16);
        let h = tuning().height;
        let mut pos = Vec3::new(3.0, h, 3.0);
        let mut vel = Vec3::ZERO;

        for _ in 0..10 {
            let step = tick(&world, &mut pos, &mut vel, MovementIntent::empty());
            assert!(step.grounded);
        }
        assert_eq!(pos.y, h);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_jump_then_fall() {
        let mut world = VoxelWorld::new(16);
        let t = tuning();
        let mut pos = Vec3::new(8.5, t.height, 8.5);
        let mut vel = Vec3::ZERO;

        vel.y = t.jump_strength;
        tick(&world, &mut pos, &mut vel, MovementIntent::empty());
        assert!(pos.y > t.height);

        world.clear_all();
        let mut previous = vel.y;
        let mut ticks = 0;
        loop {
            let step = tick(&world, &mut pos, &mut vel, MovementIntent::empty());
            ticks += 1;
            assert!(ticks < 200, "never landed");
            if step.grounded {
                break;
            }
            assert!(vel.y < previous);
            previous = vel.y;
        }
        assert_eq!(pos.y, t.height);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let world = VoxelWorld::new(16);
        let t = tuning();

        let mut pos = Vec3::new(8.5, t.height, 8.5);
        let mut vel = Vec3::ZERO;
        let step = tick(&world, &mut pos, &mut vel, MovementIntent::JUMP);
        assert!(step.jumped);
        assert_eq!(vel.y, t.jump_strength);

        let step = tick(&world, &mut pos, &mut vel, MovementIntent::JUMP);
        assert!(!step.grounded);
        assert!(!step.jumped);
        assert_relative_eq!(vel.y, t.jump_strength + t.gravity, epsilon = 1e-6);
    }

    #[test]
    fn test_walk_forward_follows_target_yaw() {
        let world = VoxelWorld::new(16);
        let t = tuning();

        let mut pos = Vec3::new(8.5, t.height, 8.5);
        let mut vel = Vec3::ZERO;
        tick(&world, &mut pos, &mut vel, MovementIntent::FORWARD);
        assert_relative_eq!(pos.z, 8.5 - t.speed, epsilon = 1e-5);
        assert_relative_eq!(pos.x, 8.5, epsilon = 1e-5);

        let mut pos = Vec3::new(8.5, t.height, 8.5);
        resolve_player(&world, &mut pos, &mut vel, MovementIntent::FORWARD, FRAC_PI_2, &t);
        assert_relative_eq!(pos.x, 8.5 - t.speed, epsilon = 1e-5);
        assert_relative_eq!(pos.z, 8.5, epsilon = 1e-5);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let world = VoxelWorld::new(16);
        let t = tuning();
        let mut pos = Vec3::new(8.5, t.height, 8.5);
        let mut vel = Vec3::ZERO;

        tick(&world, &mut pos, &mut vel, MovementIntent::FORWARD | MovementIntent::RIGHT);
        let moved = Vec3::new(pos.x - 8.5, 0.0, pos.z - 8.5).length();
        assert_relative_eq!(moved, t.speed, epsilon = 1e-5);
    }

    #[test]
    fn test_head_block_rejects_move() {
        let mut world = VoxelWorld::new(16);
        let t = tuning();
        world.add_block(BlockCoord::new(5, 1, 3), BlockType::TexturedDirt, None);

        let mut pos = Vec3::new(5.5, t.height, 4.05);
        let mut vel = Vec3::ZERO;
        let step = tick(&world, &mut pos, &mut vel, MovementIntent::FORWARD);

        assert!(step.blocked);
        assert_eq!(pos.x, 5.5);
        assert_eq!(pos.z, 4.05);
    }

    #[test]
    fn test_feet_block_rejects_move_off_floor() {
        let mut world = VoxelWorld::new(16);
        let t = tuning();
        world.init_terrain(16, None);
        world.add_block(BlockCoord::new(5, 1, 3), BlockType::TexturedDirt, None);

        let mut pos = Vec3::new(5.5, t.height + 1.0, 4.05);
        let mut vel = Vec3::ZERO;
        let step = tick(&world, &mut pos, &mut vel, MovementIntent::FORWARD);

        assert!(step.grounded);
        assert!(step.blocked);
        assert_eq!(pos.z, 4.05);
    }

    #[test]
    fn test_walks_freely_on_terrain() {
        let mut world = VoxelWorld::new(16);
        let t = tuning();
        world.init_terrain(16, None);

        let mut pos = Vec3::new(5.5, t.height + 1.0, 4.05);
        let mut vel = Vec3::ZERO;
        for _ in 0..3 {
            let step = tick(&world, &mut pos, &mut vel, MovementIntent::FORWARD);
            assert!(step.moved);
        }
        assert_relative_eq!(pos.z, 4.05 - 3.0 * t.speed, epsilon = 1e-4);
        assert_relative_eq!(pos.y, t.height + 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_smoothing_halves_gap() {
        let mut current = Rotation::default();
        let target = Rotation::new(0.4, -1.0);

        smooth_rotation(&mut current, target, 0.5);
        assert_relative_eq!(current.pitch, 0.2);
        assert_relative_eq!(current.yaw, -0.5);

        smooth_rotation(&mut current, target, 0.5);
        assert_relative_eq!(current.pitch, 0.3);
        assert_relative_eq!(current.yaw, -0.75);
    }
}
