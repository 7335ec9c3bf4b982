//! Service configuration loaded from `launcher-dist.toml`.

use crate::errors::CliError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Default configuration file name, looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "launcher-dist.toml";

/// Service configuration stored in launcher-dist.toml.
///
/// ```toml
/// content_root = "/srv/clients"
/// workers = 8
/// load_timeout_secs = 120
/// verify_checksums = false
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Root directory holding every platform's source directory.
    pub content_root: Option<Utf8PathBuf>,
    /// Worker pool size for the load phase.
    pub workers: Option<usize>,
    /// Abort startup if loading takes longer than this.
    pub load_timeout_secs: Option<u64>,
    /// Treat a checksum mismatch on fetch as a miss.
    pub verify_checksums: bool,
}

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// Returns the default configuration file path (launcher-dist.toml).
pub fn default_config_path() -> Option<Utf8PathBuf> {
    install_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Loads the service configuration.
///
/// An explicit path must exist. Without one, the default path is tried and a
/// missing file yields the default configuration.
pub fn load_config(explicit: Option<&Utf8Path>) -> Result<ServiceConfig, CliError> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.to_path_buf()));
            }
            read_config(path)
        }
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => Ok(ServiceConfig::default()),
        },
    }
}

fn read_config(path: &Utf8Path) -> Result<ServiceConfig, CliError> {
    let content = fs::read_to_string(path)?;
    let cfg = toml::from_str(&content)
        .map_err(|e| CliError::config_parse_error(path.to_path_buf(), e))?;
    tracing::debug!("Loaded configuration from {}", path);
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn utf8(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempdir().unwrap();
        let path = utf8(&dir).join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "content_root = \"/srv/clients\"\nworkers = 3\nverify_checksums = true\n",
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.content_root.as_deref(), Some(Utf8Path::new("/srv/clients")));
        assert_eq!(cfg.workers, Some(3));
        assert_eq!(cfg.load_timeout_secs, None);
        assert!(cfg.verify_checksums);
    }

    #[test]
    fn test_empty_config_is_default() {
        let dir = tempdir().unwrap();
        let path = utf8(&dir).join(CONFIG_FILE_NAME);
        fs::write(&path, "").unwrap();

        assert_eq!(load_config(Some(&path)).unwrap(), ServiceConfig::default());
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempdir().unwrap();
        let path = utf8(&dir).join("nope.toml");

        assert!(matches!(
            load_config(Some(&path)),
            Err(CliError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_config() {
        let dir = tempdir().unwrap();
        let path = utf8(&dir).join(CONFIG_FILE_NAME);
        fs::write(&path, "workers = \"many\"\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(CliError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempdir().unwrap();
        let path = utf8(&dir).join(CONFIG_FILE_NAME);
        fs::write(&path, "content_rot = \"/srv\"\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(CliError::ConfigParseError { .. })
        ));
    }
}
