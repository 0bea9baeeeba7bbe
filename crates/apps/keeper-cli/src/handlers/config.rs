use crate::ui::{Layout, Messages};
use anyhow::{Result, anyhow, bail};
use keeper_core::FileConfigStore;
use keeper_core::models::{BackupConfig, ConfigPatch, LogLevel};
use keeper_core::ports::{ConfigStore, Notifier};

const KEYS: [&str; 6] = [
    "backup-items",
    "retention-days",
    "encryption-enabled",
    "logging-enabled",
    "log-level",
    "log-file",
];

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(anyhow!("Expected true or false, got: {}", value)),
    }
}

fn parse_log_level(value: &str) -> Result<LogLevel> {
    serde_json::from_value(serde_json::Value::String(value.to_uppercase()))
        .map_err(|_| anyhow!("Unknown log level: {}", value))
}

/// Current value of a settable key, in the same form `--set` accepts.
pub fn get_value(config: &BackupConfig, key: &str) -> Result<String> {
    Ok(match key {
        "backup-items" => config.backup_items.join(","),
        "retention-days" => config.retention_days.to_string(),
        "encryption-enabled" => config.encryption_enabled.to_string(),
        "logging-enabled" => config.logging.enabled.to_string(),
        "log-level" => serde_json::to_value(config.logging.log_level)?
            .as_str()
            .unwrap_or_default()
            .to_string(),
        "log-file" => config.logging.log_file.clone(),
        _ => bail!("Unknown config key: {} (known: {})", key, KEYS.join(", ")),
    })
}

/// Builds the overlay for `key=value`. Logging keys carry the whole current logging block.
pub fn patch_for(config: &BackupConfig, key_value: &str) -> Result<ConfigPatch> {
    let (key, value) = key_value
        .split_once('=')
        .ok_or_else(|| anyhow!("Usage: keeper config --set key=value"))?;
    let (key, value) = (key.trim(), value.trim());

    let mut patch = ConfigPatch::default();
    let mut logging = config.logging.clone();
    match key {
        "backup-items" => {
            patch.backup_items = Some(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        }
        "retention-days" => {
            patch.retention_days = Some(
                value
                    .parse()
                    .map_err(|_| anyhow!("retention-days must be a whole number"))?,
            )
        }
        "encryption-enabled" => patch.encryption_enabled = Some(parse_bool(value)?),
        "logging-enabled" => {
            logging.enabled = parse_bool(value)?;
            patch.logging = Some(logging);
        }
        "log-level" => {
            logging.log_level = parse_log_level(value)?;
            patch.logging = Some(logging);
        }
        "log-file" => {
            logging.log_file = value.to_string();
            patch.logging = Some(logging);
        }
        _ => bail!("Unknown config key: {} (known: {})", key, KEYS.join(", ")),
    }
    Ok(patch)
}

fn show(layout: &Layout, config: &BackupConfig) {
    layout.header_dashboard("CONFIGURATION");
    layout.section_timeline("cf", "Current Settings");
    layout.row_labeled("◫", "Backup Items", &config.backup_items.join(", "));
    layout.row_labeled("◷", "Retention Days", &config.retention_days.to_string());
    layout.row_labeled(
        "◆",
        "Encryption",
        if config.encryption_enabled { "on" } else { "off" },
    );
    layout.row_labeled("#", "Backups Run", &config.backup_count.to_string());
    layout.section_end();

    layout.section_timeline("lg", "Logging");
    layout.row_labeled("◆", "Enabled", &config.logging.enabled.to_string());
    layout.row_labeled("◫", "Log File", &config.logging.log_file);
    layout.row_labeled("◇", "Level", config.logging.log_level.as_filter());
    layout.row_labeled(
        "◷",
        "Rotation",
        &format!(
            "{} MB x {} files",
            config.logging.max_file_size_mb, config.logging.backup_count
        ),
    );
    layout.section_end();
    layout.empty();
    layout.badge_info(
        "TIP",
        "Use 'keeper config --set key=value' to change settings",
    );
}

pub async fn handle_config(
    store: &FileConfigStore,
    get: Option<String>,
    set: Option<String>,
    reset: bool,
) -> Result<()> {
    let messages = Messages::new();

    if reset {
        store.reset().await?;
        messages.success("Config reset to defaults");
        return Ok(());
    }

    let config = store.load().await?;

    if let Some(key) = get {
        println!("{}", get_value(&config, &key)?);
        return Ok(());
    }

    if let Some(key_value) = set {
        let patch = patch_for(&config, &key_value)?;
        store.save(patch).await?;
        messages.success(&format!("Set {}", key_value));
        return Ok(());
    }

    show(&Layout::new(), &config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reset_recovers_from_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(dir.path());
        std::fs::write(store.path(), "{ \"retention_days\": ").unwrap();
        assert!(store.load().await.is_err());

        handle_config(&store, None, None, true).await.unwrap();
        assert_eq!(store.load().await.unwrap(), BackupConfig::default());
    }

    #[test]
    fn set_builds_targeted_patch() {
        let config = BackupConfig::default();

        let patch = patch_for(&config, "retention-days=14").unwrap();
        assert_eq!(patch.retention_days, Some(14));
        assert!(patch.logging.is_none());

        let patch = patch_for(&config, "backup-items=/etc, /srv ,").unwrap();
        assert_eq!(
            patch.backup_items,
            Some(vec!["/etc".to_string(), "/srv".to_string()])
        );

        let patch = patch_for(&config, "log-level=warning").unwrap();
        let logging = patch.logging.unwrap();
        assert_eq!(logging.log_level, LogLevel::Warning);
        assert_eq!(logging.log_file, config.logging.log_file);
    }

    #[test]
    fn set_rejects_bad_input() {
        let config = BackupConfig::default();
        assert!(patch_for(&config, "retention-days").is_err());
        assert!(patch_for(&config, "retention-days=soon").is_err());
        assert!(patch_for(&config, "encryption-enabled=maybe").is_err());
        assert!(patch_for(&config, "colour=blue").is_err());
    }

    #[test]
    fn get_round_trips_through_set() {
        let config = BackupConfig::default();
        for key in KEYS {
            let value = get_value(&config, key).unwrap();
            let next = config
                .apply(patch_for(&config, &format!("{}={}", key, value)).unwrap())
                .unwrap();
            assert_eq!(next, config, "{}", key);
        }
    }
}
