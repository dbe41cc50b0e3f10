pub mod error;

pub use error::*;

use std::path::{Path, PathBuf};

/// Environment variable overriding the environments directory
pub const HOME_ENV_VAR: &str = "CHATANOO_HOME";

const DEFAULT_DIR_NAME: &str = ".chatanoo";
const ENVIRONMENT_EXTENSION: &str = "yml";

/// Directory holding one document per environment
///
/// Resolution order:
/// 1. `CHATANOO_HOME`
/// 2. `~/.chatanoo`
pub fn environments_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(HOME_ENV_VAR) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DIR_NAME))
        .ok_or(ConfigError::HomeDirNotFound)
}

/// Same as [`environments_dir`], creating the directory when missing
pub fn ensure_environments_dir() -> Result<PathBuf> {
    let dir = environments_dir()?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// Path of the document for environment `name` inside `dir`
pub fn environment_file(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, ENVIRONMENT_EXTENSION))
}

/// Names of all environments stored in `dir`, sorted
///
/// A missing directory simply has no environments.
pub fn list_environments(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(ENVIRONMENT_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Environment names end up in bucket and IAM names, so keep them DNS-safe
pub fn validate_environment_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvironmentName(name.to_string()))
    }
}
