//! Configuration loading for the ATLAS CLI.
//!
//! The oracle API key and related settings can live in three places; this
//! crate folds them into the process environment with the priority
//! **existing env > project `.env` > XDG `config.toml`**, so a key exported
//! in the shell always wins and a one-off `.env` beats the durable
//! per-machine config under `~/.config/atlas/config.toml`.

mod dotenv;
mod xdg_toml;

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Loads `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` and the project
/// `.env`, then sets environment variables only for keys **not** already set.
///
/// * `app_name`: the XDG subdirectory, `"atlas"` for the CLI.
/// * `override_dir`: look for `.env` here instead of the current directory.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let mut keys: std::collections::HashSet<&String> = xdg_map.keys().collect();
    keys.extend(dotenv_map.keys());

    for key in keys {
        if std::env::var(key).is_ok() {
            continue; // existing env wins
        }
        if let Some(value) = dotenv_map.get(key).or_else(|| xdg_map.get(key)) {
            std::env::set_var(key, value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn restore_var(key: &str, prev: Option<String>) {
        match prev {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }

    #[test]
    fn existing_env_wins_over_every_source() {
        env::set_var("ATLAS_TEST_EXISTING", "from_env");
        let _ = load_and_apply("atlas", None);
        assert_eq!(env::var("ATLAS_TEST_EXISTING").as_deref(), Ok("from_env"));
        env::remove_var("ATLAS_TEST_EXISTING");
    }

    #[test]
    fn no_config_anywhere_is_ok() {
        let r = load_and_apply("atlas-test-nonexistent-app-98765", None::<&Path>);
        assert!(r.is_ok());
    }

    #[test]
    fn dotenv_beats_xdg_for_the_same_key() {
        let xdg_dir = tempfile::tempdir().unwrap();
        let app_dir = xdg_dir.path().join("atlas");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(
            app_dir.join("config.toml"),
            "[env]\nATLAS_TEST_PRIORITY = \"from_xdg\"\n",
        )
        .unwrap();

        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "ATLAS_TEST_PRIORITY=from_dotenv\n",
        )
        .unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("ATLAS_TEST_PRIORITY");

        let _ = load_and_apply("atlas", Some(dotenv_dir.path()));
        let val = env::var("ATLAS_TEST_PRIORITY").unwrap();
        env::remove_var("ATLAS_TEST_PRIORITY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert_eq!(val, "from_dotenv");
    }

    #[test]
    fn xdg_applies_when_dotenv_lacks_the_key() {
        let xdg_dir = tempfile::tempdir().unwrap();
        let app_dir = xdg_dir.path().join("atlas");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(
            app_dir.join("config.toml"),
            "[env]\nATLAS_TEST_XDG_ONLY = \"from_xdg\"\n",
        )
        .unwrap();

        let empty_dir = tempfile::tempdir().unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("ATLAS_TEST_XDG_ONLY");

        let _ = load_and_apply("atlas", Some(empty_dir.path()));
        let val = env::var("ATLAS_TEST_XDG_ONLY").unwrap();
        env::remove_var("ATLAS_TEST_XDG_ONLY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert_eq!(val, "from_xdg");
    }

    #[test]
    fn dotenv_alone_applies_without_any_xdg_config() {
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "ATLAS_TEST_DOTENV_ONLY=from_dotenv_only\n",
        )
        .unwrap();

        env::remove_var("ATLAS_TEST_DOTENV_ONLY");
        let _ = load_and_apply(
            "atlas-test-nonexistent-app-98765",
            Some(dotenv_dir.path()),
        );
        let val = env::var("ATLAS_TEST_DOTENV_ONLY").unwrap();
        env::remove_var("ATLAS_TEST_DOTENV_ONLY");

        assert_eq!(val, "from_dotenv_only");
    }

    #[test]
    fn broken_xdg_toml_surfaces_as_parse_error() {
        let xdg_dir = tempfile::tempdir().unwrap();
        let app_dir = xdg_dir.path().join("atlas");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), "invalid [[[\n").unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());

        let result = load_and_apply("atlas", None::<&Path>);
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }
}
