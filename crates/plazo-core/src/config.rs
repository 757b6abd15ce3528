use std::fs;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde::Deserialize;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "plazo.toml";
const CONFIG_ENV_VAR: &str = "PLAZO_CONFIG";
const DATA_ENV_VAR: &str = "PLAZO_DATA";
const DEFAULT_DATA_DIR: &str = ".plazo";
const DEFAULT_DATA_FILE: &str = "tasks.json";

fn default_notify_interval() -> u64 {
    60
}

fn default_autosave_interval() -> u64 {
    300
}

fn default_color() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: Option<PathBuf>,

    #[serde(default = "default_notify_interval")]
    pub notify_interval_secs: u64,

    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_secs: u64,

    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: None,
            notify_interval_secs: default_notify_interval(),
            autosave_interval_secs: default_autosave_interval(),
            color: default_color(),
        }
    }
}

impl Config {
    // A missing or broken config file is never fatal; the defaults carry.
    #[tracing::instrument(skip(override_path))]
    pub fn load(override_path: Option<&Path>) -> Self {
        let Some(path) = resolve_config_path(override_path) else {
            debug!("no config path resolved; using defaults");
            return Self::default();
        };

        if !path.exists() {
            debug!(file = %path.display(), "config file not found; using defaults");
            return Self::default();
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "failed reading config; using defaults");
                return Self::default();
            }
        };

        match toml::from_str::<Config>(&raw) {
            Ok(mut cfg) => {
                cfg.sanitize();
                info!(
                    file = %path.display(),
                    notify_interval_secs = cfg.notify_interval_secs,
                    autosave_interval_secs = cfg.autosave_interval_secs,
                    "loaded config"
                );
                cfg
            }
            Err(err) => {
                warn!(file = %path.display(), error = %err, "failed parsing config; using defaults");
                Self::default()
            }
        }
    }

    fn sanitize(&mut self) {
        if self.notify_interval_secs == 0 {
            self.notify_interval_secs = default_notify_interval();
        }
        if self.autosave_interval_secs == 0 {
            self.autosave_interval_secs = default_autosave_interval();
        }
    }
}

fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }

    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    dirs::config_dir().map(|dir| dir.join("plazo").join(CONFIG_FILE))
}

#[tracing::instrument(skip(cfg, override_path))]
pub fn resolve_data_path(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(raw) = std::env::var(DATA_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    if let Some(configured) = &cfg.data {
        return Ok(expand_tilde(configured));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(home.join(DEFAULT_DATA_DIR).join(DEFAULT_DATA_FILE))
}

fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: Config = toml::from_str("").expect("parse empty");
        assert_eq!(cfg.notify_interval_secs, 60);
        assert_eq!(cfg.autosave_interval_secs, 300);
        assert!(cfg.color);
        assert!(cfg.data.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg: Config = toml::from_str(
            "data = \"/tmp/tasks.json\"\nnotify_interval_secs = 30\ncolor = false\n",
        )
        .expect("parse");
        assert_eq!(cfg.data.as_deref(), Some(std::path::Path::new("/tmp/tasks.json")));
        assert_eq!(cfg.notify_interval_secs, 30);
        assert_eq!(cfg.autosave_interval_secs, 300);
        assert!(!cfg.color);
    }
}
