use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::gameplay::{ControlConfig, NpcTuning, PlayerTuning};
use super::network::NetworkConfig;
use crate::utils::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub player: PlayerTuning,
    pub npc: NpcTuning,
    pub control: ControlConfig,
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of the cubic world.
    pub size: i32,
    /// Where `freeland` writes the block layout when a session ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 16,
            snapshot: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

/// Reads the config at `path`, writing a default one first if none exists.
pub fn load_or_create_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    if !path.exists() {
        let default_config = EngineConfig::default();
        let toml_content = toml::to_string_pretty(&default_config)?;
        std::fs::write(path, toml_content).map_err(io_err)?;
        return Ok(default_config);
    }

    let content = std::fs::read_to_string(path).map_err(io_err)?;
    Ok(toml::from_str(&content)?)
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("com", "freeland", "Freeland").ok_or(ConfigError::NoProjectDir)?;
    Ok(proj_dirs.config_dir().join("freeland.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::network::ReconnectPolicy;
    use tempfile::tempdir;

    #[test]
    fn test_creates_default_file_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("freeland.toml");

        let config = load_or_create_config(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.world.size, 16);
        assert_eq!(config.npc.count, 3);

        let reloaded = load_or_create_config(&path).unwrap();
        assert_eq!(reloaded.player.spawn, config.player.spawn);
        assert_eq!(reloaded.network.reconnect, ReconnectPolicy::Fixed { delay_ms: 1 });
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("freeland.toml");
        std::fs::write(
            &path,
            "[world]\nsize = 32\n\n[network]\nport = 7001\n\n[network.reconnect]\nkind = \"exponential\"\ninitial_ms = 5\nmax_ms = 500\n",
        )
        .unwrap();

        let config = load_or_create_config(&path).unwrap();
        assert_eq!(config.world.size, 32);
        assert_eq!(config.network.port, 7001);
        assert_eq!(config.network.host, "127.0.0.1");
        assert_eq!(
            config.network.reconnect,
            ReconnectPolicy::Exponential {
                initial_ms: 5,
                max_ms: 500
            }
        );
        assert_eq!(config.player.height, 1.8);
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("freeland.toml");
        std::fs::write(&path, "[world\nsize = ").unwrap();

        assert!(matches!(
            load_or_create_config(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_log_level_means_info() {
        let logging = LoggingConfig {
            level: "chatty".to_string(),
        };
        assert_eq!(logging.level_filter(), LevelFilter::Info);
    }
}
