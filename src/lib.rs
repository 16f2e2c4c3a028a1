pub mod assets;
pub mod config;
pub mod engine;
pub mod entity;
pub mod net;
pub mod npc;
pub mod physics;
pub mod player;
pub mod systems;
pub mod utils;
pub mod world;

// Re-export commonly used types
pub use assets::AssetCatalog;
pub use config::{EngineConfig, NetworkConfig, ReconnectPolicy};
pub use engine::{EngineStats, GameEngine};
pub use entity::{Entity, EntityAllocator, EntityId};
pub use net::{ConnectionManager, ConnectionState, Endpoint, LoopbackTransport, TcpTransport, Transport};
pub use npc::Npc;
pub use player::{InputEvent, InputSender, Player};
pub use systems::{GameSystem, SimulationContext, SystemKind};
pub use utils::error::{ConfigError, EngineError, NetError, WorldError};
pub use world::{BlockCoord, BlockType, VoxelWorld};
