//! Discrete per-tick movement against the block grid.
//!
//! Velocities are in blocks per tick and are never scaled by measured frame
//! time; the simulation assumes a steady tick of [`PHYSICS_DT`] seconds.

pub mod npc;
pub mod player;

pub use npc::{npc_can_move_to, step_npc, NpcStep};
pub use player::{resolve_player, smooth_rotation, PlayerStep};

/// Length of one simulation tick in seconds.
pub const PHYSICS_DT: f32 = 1.0 / 60.0;

/// How far above floor height an entity must be before its feet cell is checked for horizontal moves.
pub const FLOOR_MARGIN: f32 = 0.01;

/// Nudge that keeps a body resting exactly on a block top from sampling the block itself.
pub const FEET_EPSILON: f32 = 1e-3;

/// Closest an NPC may get to the world edge.
pub const NPC_EDGE: f32 = 0.1;
