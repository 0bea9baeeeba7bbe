use crate::error::{AppError, AppResult};
use std::path::PathBuf;

/// Environment variable to override the default keeper data directory.
pub const ENV_DATA_DIR: &str = "KEEPER_HOME";

/// Name of the configuration document inside the base directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Returns the base directory for keeper data.
///
/// Checks for `KEEPER_HOME` first. If not set, falls back to `~/.keeper`.
///
/// # Returns
/// * `Ok(PathBuf)` - The base directory path
/// * `Err(AppError)` - If the override is relative or no home directory exists
pub fn get_base_dir() -> AppResult<PathBuf> {
    if let Ok(env_path) = std::env::var(ENV_DATA_DIR) {
        let path = PathBuf::from(env_path);
        if !path.is_absolute() {
            return Err(AppError::Config(format!(
                "Environment variable {} must be an absolute path, got: {:?}",
                ENV_DATA_DIR, path
            )));
        }
        return Ok(path);
    }

    match dirs::home_dir() {
        Some(home) => Ok(home.join(".keeper")),
        None => Err(AppError::Config(
            "Cannot determine home directory. Please set KEEPER_HOME environment variable."
                .to_string(),
        )),
    }
}

/// Returns the path to the configuration document.
pub fn get_settings_path() -> AppResult<PathBuf> {
    Ok(get_base_dir()?.join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share one test so they never race on the process environment.
    #[test]
    fn test_base_dir_env_override() {
        let test_path = if cfg!(windows) {
            r"C:\temp\keeper_test"
        } else {
            "/tmp/keeper_test"
        };
        unsafe { std::env::set_var(ENV_DATA_DIR, test_path) };
        let result = get_base_dir();
        assert!(result.is_ok(), "get_base_dir() failed: {:?}", result);
        assert_eq!(result.unwrap(), PathBuf::from(test_path));
        assert_eq!(
            get_settings_path().unwrap(),
            PathBuf::from(test_path).join(SETTINGS_FILE)
        );
        assert_eq!(
            crate::FileConfigStore::from_env().unwrap().path(),
            PathBuf::from(test_path).join(SETTINGS_FILE)
        );

        unsafe { std::env::set_var(ENV_DATA_DIR, "relative/path") };
        assert!(get_base_dir().is_err());

        unsafe { std::env::remove_var(ENV_DATA_DIR) };
    }
}
