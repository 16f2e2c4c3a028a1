pub mod error;
pub mod ray;

pub use error::{ConfigError, EngineError, NetError, WorldError};
pub use ray::{Ray, RayHit};
