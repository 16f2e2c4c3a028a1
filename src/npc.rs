use glam::Vec3;
use rand::Rng;

use crate::config::NpcTuning;
use crate::entity::{Entity, EntityId, Position, Velocity};
use crate::physics::npc::{draw_timer, step_npc, NpcStep};
use crate::world::VoxelWorld;

/// Height NPCs stand at.
pub const NPC_FLOOR_Y: f32 = 1.0;

/// A wandering actor: position and velocity components plus a re-roll timer.
#[derive(Debug)]
pub struct Npc {
    entity: Entity,
    move_timer: f32,
    speed: f32,
}

impl Npc {
    pub fn new<R: Rng>(entity: Entity, x: f32, z: f32, tuning: &NpcTuning, rng: &mut R) -> Self {
        let entity = entity
            .with(Position::new(x, NPC_FLOOR_Y, z))
            .with(Velocity::default());
        Self {
            entity,
            move_timer: draw_timer(rng, tuning),
            speed: tuning.speed,
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    pub fn position(&self) -> Vec3 {
        self.entity.get::<Position>().map(Position::get).unwrap_or_default()
    }

    pub fn velocity(&self) -> Vec3 {
        self.entity.get::<Velocity>().map(Velocity::get).unwrap_or_default()
    }

    pub fn move_timer(&self) -> f32 {
        self.move_timer
    }

    pub fn set_move_timer(&mut self, seconds: f32) {
        self.move_timer = seconds;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn update<R: Rng>(&mut self, world: &VoxelWorld, tuning: &NpcTuning, rng: &mut R) -> NpcStep {
        let mut position = self.position();
        let mut velocity = self.velocity();
        let tuning = NpcTuning {
            speed: self.speed,
            ..tuning.clone()
        };

        let step = step_npc(world, &mut position, &mut velocity, &mut self.move_timer, &tuning, rng);

        self.entity.get_or_default::<Position>().set(position);
        *self.entity.get_or_default::<Velocity>().get_mut() = velocity;
        step
    }

    /// Releases the entity; the owning collection calls this when dropping the NPC.
    pub fn destroy(self) {
        self.entity.destroy();
    }
}
