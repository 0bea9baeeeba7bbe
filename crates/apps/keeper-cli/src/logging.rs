use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use keeper_core::models::LoggingConfig;
use std::path::Path;

fn file_spec(log_file: &str) -> FileSpec {
    let path = Path::new(log_file);
    let mut spec = FileSpec::default();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        spec = spec.directory(dir);
    }
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        spec = spec.basename(stem);
    }
    spec.suffix(path.extension().and_then(|s| s.to_str()).unwrap_or("log"))
        .suppress_timestamp()
}

/// Rotation threshold in bytes. Hand-edited documents skip validation, so the size saturates.
fn rotation_bytes(config: &LoggingConfig) -> u64 {
    config.max_file_size_mb.max(1).saturating_mul(1024 * 1024)
}

fn start_file_logger(config: &LoggingConfig) -> Result<LoggerHandle, flexi_logger::FlexiLoggerError> {
    Logger::try_with_env_or_str(config.log_level.as_filter())?
        .log_to_file(file_spec(&config.log_file))
        .rotate(
            Criterion::Size(rotation_bytes(config)),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.backup_count),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .format(flexi_logger::opt_format)
        .start()
}

/// Starts logging as described by the document's `logging` block.
///
/// An unwritable log location degrades to warnings on stderr instead of aborting the command.
pub fn init(config: &LoggingConfig) -> Option<LoggerHandle> {
    if !config.enabled {
        return None;
    }
    match start_file_logger(config) {
        Ok(handle) => Some(handle),
        Err(e) => {
            let handle = Logger::try_with_env_or_str("warn")
                .ok()?
                .log_to_stderr()
                .format(flexi_logger::opt_format)
                .start()
                .ok()?;
            log::warn!("Cannot log to {}: {}", config.log_file, e);
            Some(handle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_size_never_overflows() {
        let mut config = LoggingConfig::default();
        assert_eq!(rotation_bytes(&config), 10 * 1024 * 1024);

        config.max_file_size_mb = u64::MAX;
        assert_eq!(rotation_bytes(&config), u64::MAX);

        config.max_file_size_mb = 0;
        assert_eq!(rotation_bytes(&config), 1024 * 1024);
    }
}
