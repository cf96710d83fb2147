/// Application configuration
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tonearm_playback::PlayerConfig;

/// Default configuration file, read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "tonearm.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    /// Catalog TOML used when no `--catalog` is given
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// File holding the persisted theme flag
    #[serde(default = "default_theme_path")]
    pub theme_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            catalog_path: default_catalog_path(),
            theme_path: default_theme_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file {} does not exist", path.display());
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. TONEARM_PLAYER__VOLUME=0.5
        settings = settings.add_source(
            config::Environment::with_prefix("TONEARM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.player.validate().context("Invalid player settings")?;

        if self.catalog_path.as_os_str().is_empty() {
            bail!("catalog_path cannot be empty");
        }
        if self.theme_path.as_os_str().is_empty() {
            bail!("theme_path cannot be empty");
        }

        Ok(())
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.toml")
}

fn default_theme_path() -> PathBuf {
    PathBuf::from(".tonearm-theme")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_file_over_defaults() {
        let file = write_config(
            r#"
catalog_path = "music.toml"

[player]
volume = 0.6

[player.fade]
steps = 10
"#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("music.toml"));
        assert_eq!(config.theme_path, PathBuf::from(".tonearm-theme"));
        assert_eq!(config.player.volume, 0.6);
        assert_eq!(config.player.fade.steps, 10);
        assert_eq!(config.player.fade.duration_ms, 500);
        assert_eq!(config.player.analyser.fft_size, 256);
    }

    #[test]
    fn rejects_invalid_player_settings() {
        let file = write_config("[player.analyser]\nfft_size = 300\n");
        assert!(AppConfig::load(Some(file.path())).is_err());

        let file = write_config("[player.fade]\nsteps = 0\n");
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
