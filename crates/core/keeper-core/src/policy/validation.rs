use crate::models::{BackupConfig, BackupTypeConfig, CloudProviderConfig, ProviderKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const MAX_RECOMMENDED_RETENTION_DAYS: u32 = 3650;

/// Outcome of a validation pass. Errors block a save, warnings are advisory.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

pub fn validate_policy(config: &BackupTypeConfig) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.retention.days < 1 {
        errors.push("Retention days must be at least 1".to_string());
    }
    if config.retention.days > MAX_RECOMMENDED_RETENTION_DAYS {
        warnings.push(format!(
            "Retention of {} days exceeds 10 years; storage costs may be significant",
            config.retention.days
        ));
    }
    if config.retention.max_backups.is_some_and(|max| max < 1) {
        errors.push("Maximum backups must be at least 1".to_string());
    }
    if config.compression.enabled && !(1..=9).contains(&config.compression.level) {
        errors.push("Compression level must be between 1 and 9".to_string());
    }
    if !(1..=16).contains(&config.performance.parallel_jobs) {
        errors.push("Parallel jobs must be between 1 and 16".to_string());
    }
    if !(1..=1024).contains(&config.performance.chunk_size) {
        errors.push("Chunk size must be between 1 and 1024 MB".to_string());
    }
    if config.performance.max_bandwidth.is_some_and(|bw| bw < 1.0) {
        errors.push("Maximum bandwidth must be at least 1 KB/s".to_string());
    }
    if config.verification.enabled && !config.verification.integrity_check {
        warnings.push(
            "Verification is enabled without integrity checking; corrupted backups may go unnoticed"
                .to_string(),
        );
    }

    ValidationReport::from_parts(errors, warnings)
}

static LOCAL_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[a-zA-Z0-9_/.-]+$").expect("valid regex"));
static B2_BUCKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]{3,63}$").expect("valid regex"));
static B2_KEY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^K[0-9a-zA-Z]{19}$").expect("valid regex"));
static GCS_BUCKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]{2,61}[a-zA-Z0-9]$").expect("valid regex")
});
static GCP_PROJECT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]{4,28}[a-z0-9]$").expect("valid regex"));
static DROPBOX_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[a-zA-Z0-9_/.-]*$").expect("valid regex"));

fn check_range<T: PartialOrd + std::fmt::Display>(
    errors: &mut Vec<String>,
    field: &str,
    value: Option<T>,
    min: T,
    max: T,
    unit: &str,
) {
    if let Some(value) = value {
        if value < min || value > max {
            errors.push(format!("{} must be between {}{} and {}{}", field, min, unit, max, unit));
        }
    }
}

/// Field checks for one provider entry.
pub fn validate_provider(kind: ProviderKind, config: &CloudProviderConfig) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    check_range(&mut errors, "max_retries", config.max_retries, 1, 10, "");
    check_range(&mut errors, "retry_delay", config.retry_delay, 0.1, 60.0, "s");
    check_range(&mut errors, "timeout", config.timeout, 30, 3600, "s");
    check_range(
        &mut errors,
        "upload_chunk_size",
        config.upload_chunk_size,
        1024 * 1024,
        1024 * 1024 * 1024,
        " bytes",
    );
    check_range(
        &mut errors,
        "connection_pool_size",
        config.connection_pool_size,
        1,
        20,
        "",
    );
    if config.max_bandwidth.is_some_and(|bw| bw < 1024) {
        errors.push("max_bandwidth must be at least 1024 bytes per second".to_string());
    }

    let container = config.container.as_str();
    match kind {
        ProviderKind::Local => {
            let path = config.path.as_deref().unwrap_or(container);
            if !LOCAL_PATH.is_match(path) {
                errors.push(format!("'{}' must be a valid absolute path", path));
            }
        }
        ProviderKind::Backblaze => {
            if !B2_BUCKET.is_match(container) {
                errors.push(
                    "Bucket name must be 3-63 characters of letters, digits and hyphens"
                        .to_string(),
                );
            }
            if let Some(key_id) = config.application_key_id.as_deref().filter(|k| !k.is_empty())
            {
                if !B2_KEY_ID.is_match(key_id) {
                    errors.push(
                        "Application key ID must start with K and be 20 characters long"
                            .to_string(),
                    );
                }
            }
        }
        ProviderKind::GoogleCloudStorage => {
            if !GCS_BUCKET.is_match(container) {
                errors.push("Must be a valid GCS bucket name".to_string());
            }
            if let Some(project) = config.project_id.as_deref().filter(|p| !p.is_empty()) {
                if !GCP_PROJECT_ID.is_match(project) {
                    errors.push("Must be a valid Google Cloud project ID".to_string());
                }
            }
        }
        ProviderKind::Dropbox => {
            if !DROPBOX_PATH.is_match(container) {
                errors.push("Dropbox folder path must start with /".to_string());
            }
        }
        ProviderKind::AwsS3 | ProviderKind::GoogleDrive => {
            if container.trim().is_empty() {
                errors.push("Container name must not be empty".to_string());
            }
        }
    }

    if config.enabled {
        for field in config.missing_credentials(kind) {
            errors.push(format!("{} is required when the provider is enabled", field));
        }
    }
    if config.encryption_enabled && config.encryption_key.as_deref().is_none_or(str::is_empty) {
        warnings.push("Encryption is enabled but no key is set; one will be generated".to_string());
    }
    if config.username.is_some() || config.password.is_some() {
        warnings.push("username/password are legacy fields and are ignored".to_string());
    }

    ValidationReport::from_parts(errors, warnings)
}

/// Global checks on the configuration document.
pub fn validate_document(config: &BackupConfig) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.backup_items.is_empty() {
        errors.push("At least one backup item must be specified".to_string());
    }
    if let Some(types) = &config.backup_types {
        errors.extend(types.slot_errors());
    }
    if !(1..=MAX_RECOMMENDED_RETENTION_DAYS).contains(&config.retention_days) {
        errors.push("retention_days must be between 1 and 3650 days".to_string());
    }
    if !(1..=1000).contains(&config.logging.max_file_size_mb) {
        errors.push("Log max_file_size_mb must be between 1 and 1000 MB".to_string());
    }
    if !(1..=50).contains(&config.logging.backup_count) {
        errors.push("Log backup_count must be between 1 and 50".to_string());
    }
    if config.enabled_providers().is_empty() {
        warnings.push("No storage provider is enabled".to_string());
    }

    ValidationReport::from_parts(errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BackupKind, ProviderPatch};

    fn base() -> BackupTypeConfig {
        BackupTypeConfig::base(BackupKind::Full)
    }

    #[test]
    fn base_policy_is_clean() {
        let report = validate_policy(&base());
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn retention_day_boundaries() {
        let mut config = base();
        config.retention.days = 0;
        assert!(validate_policy(&config)
            .errors
            .contains(&"Retention days must be at least 1".to_string()));

        config.retention.days = 1;
        assert!(validate_policy(&config).is_valid);

        config.retention.days = 3651;
        let report = validate_policy(&config);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn every_range_rule_reports_in_order() {
        let mut config = base();
        config.retention.days = 0;
        config.retention.max_backups = Some(0);
        config.compression.level = 12;
        config.performance.parallel_jobs = 17;
        config.performance.chunk_size = 0;
        config.performance.max_bandwidth = Some(0.5);
        config.verification.integrity_check = false;

        let report = validate_policy(&config);
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![
                "Retention days must be at least 1",
                "Maximum backups must be at least 1",
                "Compression level must be between 1 and 9",
                "Parallel jobs must be between 1 and 16",
                "Chunk size must be between 1 and 1024 MB",
                "Maximum bandwidth must be at least 1 KB/s",
            ]
        );
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn compression_level_ignored_when_disabled() {
        let mut config = base();
        config.compression.enabled = false;
        config.compression.level = 0;
        assert!(validate_policy(&config).is_valid);
    }

    #[test]
    fn validation_is_idempotent() {
        let mut config = base();
        config.performance.chunk_size = 4096;
        config.verification.integrity_check = false;
        assert_eq!(validate_policy(&config), validate_policy(&config));
    }

    #[test]
    fn provider_ranges_and_patterns() {
        let mut config = CloudProviderConfig::defaults_for(ProviderKind::Backblaze);
        assert!(validate_provider(ProviderKind::Backblaze, &config).is_valid);

        config.max_retries = Some(11);
        config.timeout = Some(10);
        config.container = "ab".into();
        config.application_key_id = Some("not-a-key".into());
        let report = validate_provider(ProviderKind::Backblaze, &config);
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn gcs_project_id_pattern() {
        let config = CloudProviderConfig::defaults_for(ProviderKind::GoogleCloudStorage)
            .apply(
                ProviderKind::GoogleCloudStorage,
                ProviderPatch {
                    project_id: Some("my-project-42".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(validate_provider(ProviderKind::GoogleCloudStorage, &config).is_valid);

        let bad = CloudProviderConfig {
            project_id: Some("Bad_Project".into()),
            ..config
        };
        assert!(!validate_provider(ProviderKind::GoogleCloudStorage, &bad).is_valid);
    }

    #[test]
    fn local_path_must_be_absolute() {
        let config = CloudProviderConfig {
            path: Some("relative/dir".into()),
            ..CloudProviderConfig::defaults_for(ProviderKind::Local)
        };
        assert!(!validate_provider(ProviderKind::Local, &config).is_valid);
    }

    #[test]
    fn document_defaults_are_valid() {
        let report = validate_document(&BackupConfig::default());
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }
}
