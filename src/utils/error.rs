use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Couldn't determine project directory")]
    NoProjectDir,
}

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("Invalid block coordinate key: {0:?}")]
    InvalidCoordKey(String),

    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Assets are not loaded yet")]
    AssetsNotLoaded,

    #[error("A game session is already running")]
    AlreadyRunning,

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("World error: {0}")]
    World(#[from] WorldError),

    #[error("Network error: {0}")]
    Net(#[from] NetError),
}

#[derive(Debug, Error)]
pub enum NetError {
    #[error("Socket already destroyed")]
    Destroyed,

    #[error("Socket writer has shut down")]
    WriterClosed,

    #[error("Failed to start network runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
