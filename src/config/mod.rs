pub mod core;
pub mod gameplay;
pub mod network;

pub use self::core::{default_config_path, load_or_create_config, EngineConfig, LoggingConfig, WorldConfig};
pub use gameplay::{ControlConfig, NpcTuning, PlayerTuning};
pub use network::{NetworkConfig, ReconnectPolicy};

// Vec3 as a plain [x, y, z] array in config files
pub(crate) mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(vec: &Vec3, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let arr = [vec.x, vec.y, vec.z];
        arr.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y, z] = <[f32; 3]>::deserialize(deserializer)?;
        Ok(Vec3::new(x, y, z))
    }
}
