use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::world::BlockType;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    #[serde(with = "super::vec3_serde")]
    pub spawn: Vec3,
    pub height: f32,
    pub width: f32,
    pub speed: f32,
    pub jump_strength: f32,
    pub gravity: f32,
    pub rotation_smoothing: f32,
    pub mouse_sensitivity: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(8.0, 3.5, 8.0),
            height: 1.8,
            width: 0.4,
            speed: 0.0717,
            jump_strength: 0.2,
            gravity: -0.01,
            rotation_smoothing: 0.5,
            mouse_sensitivity: 0.005,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcTuning {
    pub count: usize,
    pub speed: f32,
    /// Bounds in seconds of the uniform draw for the next velocity change.
    pub timer_min: f32,
    pub timer_max: f32,
    /// Fixed seed for reproducible wandering; entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for NpcTuning {
    fn default() -> Self {
        Self {
            count: 3,
            speed: 0.05,
            timer_min: 1.0,
            timer_max: 3.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub reach: f32,
    pub break_delay_ms: u64,
    pub default_block: BlockType,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            reach: 5.0,
            break_delay_ms: 300,
            default_block: BlockType::TexturedDirt,
        }
    }
}
