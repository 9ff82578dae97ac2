//! Load the `[env]` table from `<config dir>/<app>/config.toml`.
//!
//! The config dir is `$XDG_CONFIG_HOME` when set, else the platform config
//! directory (`~/.config` on Linux).

use std::collections::HashMap;
use std::path::PathBuf;

use crate::LoadError;

fn config_base_dir() -> Result<PathBuf, LoadError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg));
        }
    }
    dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config directory".to_string()))
}

fn xdg_config_path(app_name: &str) -> Result<Option<PathBuf>, LoadError> {
    let path = config_base_dir()?.join(app_name).join("config.toml");
    if path.is_file() {
        Ok(Some(path))
    } else {
        Ok(None)
    }
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// Env key-value pairs from the `[env]` section. A missing file, a missing
/// section or an empty section all answer an empty map; only unreadable or
/// unparseable files are errors.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let path = match xdg_config_path(app_name)? {
        Some(p) => p,
        None => return Ok(HashMap::new()),
    };
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config.env)
}
