// SPDX-License-Identifier: MPL-2.0
//! Where settings live and where exports go.
//!
//! The config directory is the first of:
//!
//! 1. an explicit override (tests pass one to the `_with_override` functions)
//! 2. the `--config-dir` flag, recorded once at startup
//! 3. `ICED_DEHAZE_CONFIG_DIR`, when set and non-empty
//! 4. `<platform config dir>/IcedDehaze`

use std::path::PathBuf;
use std::sync::OnceLock;

const APP_DIR_NAME: &str = "IcedDehaze";

/// Environment variable naming an alternative config directory.
pub const ENV_CONFIG_DIR: &str = "ICED_DEHAZE_CONFIG_DIR";

static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Which rule picked the config directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigDirSource {
    Override,
    Cli,
    Environment,
    Platform,
}

/// Records the `--config-dir` flag. Only the first call has an effect.
pub fn init_cli_overrides(config_dir: Option<String>) {
    let _ = CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from));
}

fn env_config_dir() -> Option<PathBuf> {
    std::env::var_os(ENV_CONFIG_DIR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Resolves the config directory and reports which rule won.
#[must_use]
pub fn resolve_config_dir(override_path: Option<PathBuf>) -> Option<(PathBuf, ConfigDirSource)> {
    let cli = CLI_CONFIG_DIR.get().cloned().flatten();
    override_path
        .map(|path| (path, ConfigDirSource::Override))
        .or_else(|| cli.map(|path| (path, ConfigDirSource::Cli)))
        .or_else(|| env_config_dir().map(|path| (path, ConfigDirSource::Environment)))
        .or_else(|| {
            dirs::config_dir().map(|base| (base.join(APP_DIR_NAME), ConfigDirSource::Platform))
        })
}

/// Directory holding `settings.toml`, if one can be determined.
#[must_use]
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve_config_dir(override_path).map(|(path, _)| path)
}

/// Starting directory for the "save result" dialog: documents, else home,
/// else the working directory.
#[must_use]
pub fn default_export_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests below mutate the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<T>(value: Option<&str>, body: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        match value {
            Some(v) => std::env::set_var(ENV_CONFIG_DIR, v),
            None => std::env::remove_var(ENV_CONFIG_DIR),
        }
        let result = body();
        std::env::remove_var(ENV_CONFIG_DIR);
        result
    }

    #[test]
    fn explicit_override_wins_over_environment() {
        let resolved = with_env(Some("/from/env"), || {
            resolve_config_dir(Some(PathBuf::from("/from/test")))
        });
        assert_eq!(
            resolved,
            Some((PathBuf::from("/from/test"), ConfigDirSource::Override))
        );
    }

    #[test]
    fn environment_is_used_when_set() {
        let resolved = with_env(Some("/from/env"), || resolve_config_dir(None));
        // A CLI override recorded by another test in this process would win.
        if let Some((path, source)) = resolved {
            if source == ConfigDirSource::Environment {
                assert_eq!(path, PathBuf::from("/from/env"));
            } else {
                assert_eq!(source, ConfigDirSource::Cli);
            }
        }
    }

    #[test]
    fn empty_environment_value_is_ignored() {
        let resolved = with_env(Some(""), || resolve_config_dir(None));
        if let Some((path, source)) = resolved {
            assert_ne!(source, ConfigDirSource::Environment);
            if source == ConfigDirSource::Platform {
                assert!(path.ends_with(APP_DIR_NAME));
            }
        }
    }

    #[test]
    fn export_dir_is_never_empty() {
        assert!(!default_export_dir().as_os_str().is_empty());
    }
}
