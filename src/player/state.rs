use glam::{Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::config::PlayerTuning;
use crate::entity::{CameraBinding, Entity, Position, Rotation, Velocity};
use crate::physics::{resolve_player, smooth_rotation, PlayerStep};
use crate::player::MovementIntent;
use crate::world::VoxelWorld;

/// The controllable body: an entity carrying position, velocity and a camera
/// binding, plus the look rotation the camera eases toward.
#[derive(Debug)]
pub struct Player {
    entity: Entity,
    tuning: PlayerTuning,
    target_rotation: Rotation,
    current_rotation: Rotation,
}

impl Player {
    pub fn new(entity: Entity, tuning: PlayerTuning) -> Self {
        let spawn = tuning.spawn;
        let entity = entity
            .with(Position(spawn))
            .with(Velocity::default())
            .with(CameraBinding::default());

        let mut player = Self {
            entity,
            tuning,
            target_rotation: Rotation::default(),
            current_rotation: Rotation::default(),
        };
        player.sync_camera();
        player
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    pub fn position(&self) -> Vec3 {
        self.entity.get::<Position>().map(Position::get).unwrap_or_default()
    }

    pub fn set_position(&mut self, pos: Vec3) {
        self.entity.get_or_default::<Position>().set(pos);
    }

    pub fn velocity(&self) -> Vec3 {
        self.entity.get::<Velocity>().map(Velocity::get).unwrap_or_default()
    }

    pub fn set_velocity(&mut self, x: f32, y: f32, z: f32) {
        self.entity.get_or_default::<Velocity>().set(x, y, z);
    }

    pub fn target_rotation(&self) -> Rotation {
        self.target_rotation
    }

    pub fn set_target_rotation(&mut self, rotation: Rotation) {
        self.target_rotation = rotation;
    }

    pub fn current_rotation(&self) -> Rotation {
        self.current_rotation
    }

    pub fn set_current_rotation(&mut self, rotation: Rotation) {
        self.current_rotation = rotation;
    }

    pub fn camera(&self) -> CameraBinding {
        self.entity.get::<CameraBinding>().copied().unwrap_or_default()
    }

    /// Turns pointer motion into a new target rotation; pitch stops at straight up/down.
    pub fn apply_pointer_delta(&mut self, delta: Vec2) {
        let sensitivity = self.tuning.mouse_sensitivity;
        self.target_rotation.yaw -= delta.x * sensitivity;
        self.target_rotation.pitch -= delta.y * sensitivity;
        self.target_rotation.pitch = self.target_rotation.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// One simulation tick: movement, then rotation easing, then camera sync.
    pub fn update(&mut self, world: &VoxelWorld, intent: MovementIntent) -> PlayerStep {
        let mut position = self.position();
        let mut velocity = self.velocity();

        let step = resolve_player(
            world,
            &mut position,
            &mut velocity,
            intent,
            self.target_rotation.yaw,
            &self.tuning,
        );

        self.set_position(position);
        self.set_velocity(velocity.x, velocity.y, velocity.z);
        smooth_rotation(
            &mut self.current_rotation,
            self.target_rotation,
            self.tuning.rotation_smoothing,
        );
        self.sync_camera();
        step
    }

    /// Back to spawn, level view.
    pub fn reset_for_session(&mut self) {
        self.set_position(self.tuning.spawn);
        self.target_rotation = Rotation::default();
        self.current_rotation = Rotation::default();
        self.sync_camera();
    }

    /// Back to spawn at rest.
    pub fn reset_after_session(&mut self) {
        self.set_position(self.tuning.spawn);
        self.set_velocity(0.0, 0.0, 0.0);
        self.sync_camera();
    }

    pub fn sync_camera(&mut self) {
        let eye = self.position();
        let rotation = self.current_rotation;
        self.entity.get_or_default::<CameraBinding>().sync(eye, rotation);
    }
}
