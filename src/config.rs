//! Runtime configuration.
//!
//! Precedence: CLI flag > environment > YAML config file > built-in default.
//!
//! ```yaml
//! tables_dir: /var/tmp/acpi-dump
//! json: false
//! color: true
//! emoji: false
//! ```
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::platform::sysfs::DEFAULT_TABLES_DIR;

/// Environment fallback for `--tables-dir`.
pub const ENV_TABLES_DIR: &str = "NVDIMM_ACPI_TABLES_DIR";
/// Environment fallback for `--config`.
pub const ENV_CONFIG: &str = "NVDIMM_ACPI_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Contents of the optional YAML config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub tables_dir: Option<PathBuf>,
    pub json: Option<bool>,
    pub color: Option<bool>,
    pub emoji: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not to a map.
        if raw.trim().is_empty() {
            return Ok(FileConfig::default());
        }
        serde_yaml::from_str(raw)
    }
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub tables_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tables_dir: PathBuf,
    pub json: bool,
    pub color: Option<bool>,
    pub emoji: Option<bool>,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn resolve(cli: CliOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with(
        cli: CliOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env_nonempty = |key: &str| env(key).filter(|s| !s.trim().is_empty());

        let config_path = cli
            .config
            .or_else(|| env_nonempty(ENV_CONFIG).map(PathBuf::from));
        let file = match &config_path {
            Some(p) => {
                tracing::debug!(path = %p.display(), "loading config file");
                FileConfig::load(p)?
            }
            None => FileConfig::default(),
        };

        let tables_dir = cli
            .tables_dir
            .or_else(|| env_nonempty(ENV_TABLES_DIR).map(PathBuf::from))
            .or(file.tables_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TABLES_DIR));

        Ok(Settings {
            tables_dir,
            json: cli.json || file.json.unwrap_or(false),
            color: file.color,
            emoji: file.emoji,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_to_sysfs() {
        let s = Settings::resolve_with(CliOverrides::default(), env_of(&[])).unwrap();
        assert_eq!(s.tables_dir, PathBuf::from(DEFAULT_TABLES_DIR));
        assert!(!s.json);
        assert_eq!(s.color, None);
    }

    #[test]
    fn cli_beats_env() {
        let cli = CliOverrides {
            tables_dir: Some("/from/cli".into()),
            ..Default::default()
        };
        let s = Settings::resolve_with(cli, env_of(&[(ENV_TABLES_DIR, "/from/env")])).unwrap();
        assert_eq!(s.tables_dir, PathBuf::from("/from/cli"));
    }

    #[test]
    fn blank_env_is_ignored() {
        let s = Settings::resolve_with(CliOverrides::default(), env_of(&[(ENV_TABLES_DIR, "  ")]))
            .unwrap();
        assert_eq!(s.tables_dir, PathBuf::from(DEFAULT_TABLES_DIR));
    }

    #[test]
    fn env_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("nvdimm-acpi.yaml");
        fs::write(&cfg, "tables_dir: /from/file\njson: true\nemoji: false\n").unwrap();

        let cli = CliOverrides {
            config: Some(cfg.clone()),
            ..Default::default()
        };
        let s = Settings::resolve_with(cli.clone(), env_of(&[(ENV_TABLES_DIR, "/from/env")]))
            .unwrap();
        assert_eq!(s.tables_dir, PathBuf::from("/from/env"));
        assert!(s.json);
        assert_eq!(s.emoji, Some(false));

        let s = Settings::resolve_with(cli, env_of(&[])).unwrap();
        assert_eq!(s.tables_dir, PathBuf::from("/from/file"));
    }

    #[test]
    fn config_path_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("c.yaml");
        fs::write(&cfg, "color: false\n").unwrap();
        let s = Settings::resolve_with(
            CliOverrides::default(),
            env_of(&[(ENV_CONFIG, cfg.to_str().unwrap())]),
        )
        .unwrap();
        assert_eq!(s.color, Some(false));
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(FileConfig::parse("").unwrap(), FileConfig::default());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("bad.yaml");
        fs::write(&cfg, "tabels_dir: /oops\n").unwrap();
        let err = FileConfig::load(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = FileConfig::load(Path::new("/nonexistent/nvdimm-acpi.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
