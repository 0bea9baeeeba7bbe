use super::history::{BackupRecord, BackupStatistics, RunState};
use super::policy::BackupTypes;
use super::provider::{CloudProviderConfig, ProviderKind, ProviderPatch, ProviderStatus};
use super::schedule::BackupScheduleConfig;
use crate::error::{AppError, AppResult};
use crate::policy::{validate_document, validate_policy};
use crate::schedule::validate_schedule;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Level filter understood by `flexi_logger`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub log_file: String,
    pub log_level: LogLevel,
    pub max_file_size_mb: u64,
    /// Number of rotated log files to keep.
    pub backup_count: usize,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: "/var/log/keeper/backup.log".to_string(),
            log_level: LogLevel::Info,
            max_file_size_mb: 10,
            backup_count: 5,
            format: "{timestamp} - {module} - {level} - {message}".to_string(),
        }
    }
}

/// The whole configuration document. It is the unit of load and save.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackupConfig {
    #[serde(default)]
    pub backup_items: Vec<String>,
    #[serde(default)]
    pub providers: BTreeMap<ProviderKind, CloudProviderConfig>,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default)]
    pub encryption_enabled: bool,
    #[serde(default)]
    pub backup_count: u64,
    #[serde(
        rename = "backupTypes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub backup_types: Option<BackupTypes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BackupScheduleConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default, skip_serializing_if = "RunState::is_empty")]
    pub state: RunState,
}

fn default_retention_days() -> u32 {
    30
}

impl Default for BackupConfig {
    fn default() -> Self {
        let mut providers = BTreeMap::new();
        for kind in [
            ProviderKind::Local,
            ProviderKind::AwsS3,
            ProviderKind::GoogleCloudStorage,
            ProviderKind::Backblaze,
        ] {
            providers.insert(kind, CloudProviderConfig::defaults_for(kind));
        }
        if let Some(local) = providers.get_mut(&ProviderKind::Local) {
            local.enabled = true;
        }

        Self {
            backup_items: vec![
                "/etc".to_string(),
                "/var/lib".to_string(),
                "/home".to_string(),
            ],
            providers,
            retention_days: default_retention_days(),
            encryption_enabled: true,
            backup_count: 0,
            backup_types: None,
            schedule: None,
            logging: LoggingConfig::default(),
            state: RunState::default(),
        }
    }
}

/// Partial document accepted by save: every field present overrides the stored one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ConfigPatch {
    pub backup_items: Option<Vec<String>>,
    pub providers: Option<BTreeMap<ProviderKind, ProviderPatch>>,
    pub retention_days: Option<u32>,
    pub encryption_enabled: Option<bool>,
    pub backup_count: Option<u64>,
    #[serde(rename = "backupTypes")]
    pub backup_types: Option<BackupTypes>,
    pub schedule: Option<BackupScheduleConfig>,
    pub logging: Option<LoggingConfig>,
}

impl BackupConfig {
    /// Policies for each backup kind, falling back to the base policy when the document
    /// has none.
    pub fn backup_types(&self) -> BackupTypes {
        self.backup_types.clone().unwrap_or_default()
    }

    pub fn provider(&self, kind: ProviderKind) -> Option<&CloudProviderConfig> {
        self.providers.get(&kind)
    }

    pub fn enabled_providers(&self) -> Vec<ProviderKind> {
        self.providers
            .iter()
            .filter(|(_, config)| config.enabled)
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Status list for every known provider, in catalog order.
    pub fn provider_statuses(&self) -> Vec<ProviderStatus> {
        ProviderKind::ALL
            .into_iter()
            .map(|kind| ProviderStatus::new(kind, self.providers.get(&kind)))
            .collect()
    }

    /// Copy with every provider's secrets redacted.
    pub fn redacted(&self) -> Self {
        Self {
            providers: self
                .providers
                .iter()
                .map(|(kind, config)| (*kind, config.redacted()))
                .collect(),
            ..self.clone()
        }
    }

    /// Overlays `patch` onto a copy of this document and validates the result.
    ///
    /// Provider patches for kinds not yet in the document start from that provider's
    /// defaults. Only errors block; warnings are left to the caller.
    pub fn apply(&self, patch: ConfigPatch) -> AppResult<Self> {
        let mut next = self.clone();

        if let Some(items) = patch.backup_items {
            next.backup_items = items;
        }
        if let Some(days) = patch.retention_days {
            next.retention_days = days;
        }
        if let Some(enabled) = patch.encryption_enabled {
            next.encryption_enabled = enabled;
        }
        if let Some(count) = patch.backup_count {
            next.backup_count = count;
        }
        if let Some(logging) = patch.logging {
            next.logging = logging;
        }
        if let Some(providers) = patch.providers {
            for (kind, provider_patch) in providers {
                debug!("Applying overlay to provider {}", kind);
                let current = next
                    .providers
                    .get(&kind)
                    .cloned()
                    .unwrap_or_else(|| CloudProviderConfig::defaults_for(kind));
                let updated = current.apply(kind, provider_patch)?;
                next.providers.insert(kind, updated);
            }
        }

        let mut errors = Vec::new();
        if let Some(types) = patch.backup_types {
            for policy in types.iter() {
                let report = validate_policy(policy);
                errors.extend(
                    report
                        .errors
                        .into_iter()
                        .map(|e| format!("{}: {}", policy.kind, e)),
                );
            }
            next.backup_types = Some(types);
        }
        if let Some(schedule) = patch.schedule {
            errors.extend(validate_schedule(&schedule).errors);
            next.schedule = Some(schedule);
        }
        errors.extend(validate_document(&next).errors);

        if errors.is_empty() {
            Ok(next)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// Appends a run to the history; successful runs also bump `backup_count`.
    pub fn with_run_recorded(&self, record: BackupRecord) -> Self {
        Self {
            backup_count: self.backup_count + u64::from(record.success),
            state: self.state.recorded(record),
            ..self.clone()
        }
    }

    pub fn statistics(&self) -> BackupStatistics {
        let enabled: Vec<_> = self.providers.iter().filter(|(_, p)| p.enabled).collect();
        BackupStatistics {
            total_backups: self.state.backup_history.len(),
            last_backup: self.state.last_daily_backup.clone(),
            providers_active: enabled
                .iter()
                .filter(|(kind, provider)| provider.is_configured(**kind))
                .count(),
            providers_configured: enabled.len(),
            backup_success_rate: self.state.success_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::policy::{BackupKind, BackupTypeConfig};

    #[test]
    fn default_document_round_trips_through_json() {
        let config = BackupConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"google_cloud_storage\""));
        assert!(!json.contains("backupTypes"));

        let parsed: BackupConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn unknown_provider_key_fails_deserialization() {
        let result = serde_json::from_str::<BackupConfig>(
            r#"{"backup_items":["/etc"],"providers":{"ftp":{"enabled":true}}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn apply_overlays_only_present_fields() {
        let config = BackupConfig::default();
        let next = config
            .apply(ConfigPatch {
                retention_days: Some(60),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(next.retention_days, 60);
        assert_eq!(next.backup_items, config.backup_items);
        assert_eq!(config.retention_days, 30);
    }

    #[test]
    fn apply_rejects_out_of_range_document() {
        let config = BackupConfig::default();
        let err = config
            .apply(ConfigPatch {
                backup_items: Some(vec![]),
                retention_days: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn apply_prefixes_policy_errors_with_kind() {
        let mut types = BackupTypes::default();
        types.differential = BackupTypeConfig::base(BackupKind::Differential);
        types.differential.retention.days = 0;

        let err = BackupConfig::default()
            .apply(ConfigPatch {
                backup_types: Some(types),
                ..Default::default()
            })
            .unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].starts_with("differential: "));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn apply_rejects_policy_in_wrong_slot() {
        let mut types = BackupTypes::default();
        types.full = BackupTypeConfig::base(BackupKind::Incremental);

        let err = BackupConfig::default()
            .apply(ConfigPatch {
                backup_types: Some(types),
                ..Default::default()
            })
            .unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors, vec!["backupTypes.full holds a policy of type incremental"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn apply_creates_missing_provider_from_defaults() {
        let next = BackupConfig::default()
            .apply(ConfigPatch {
                providers: Some(BTreeMap::from([(
                    ProviderKind::Dropbox,
                    ProviderPatch {
                        container: Some("/Backups".into()),
                        ..Default::default()
                    },
                )])),
                ..Default::default()
            })
            .unwrap();

        let dropbox = next.provider(ProviderKind::Dropbox).unwrap();
        assert_eq!(dropbox.container, "/Backups");
        assert_eq!(dropbox.container_type, "folder");
        assert!(!dropbox.enabled);
    }

    #[test]
    fn recorded_runs_feed_statistics() {
        let record = |success| BackupRecord {
            timestamp: "2026-10-18T02:00:00+00:00".to_string(),
            backup_type: BackupKind::Full,
            success,
            files: 3,
            errors: usize::from(!success),
        };
        let config = BackupConfig::default()
            .with_run_recorded(record(true))
            .with_run_recorded(record(false));

        assert_eq!(config.backup_count, 1);
        let stats = config.statistics();
        assert_eq!(stats.total_backups, 2);
        assert_eq!(stats.backup_success_rate, 50.0);
        assert_eq!(stats.last_backup.as_deref(), Some("2026-10-18T02:00:00+00:00"));
        assert_eq!(stats.providers_configured, 1);
        assert_eq!(stats.providers_active, 1);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["state"]["backup_history"][1]["success"], false);
        let patched = config
            .apply(ConfigPatch {
                retention_days: Some(7),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(patched.state, config.state);
    }

    #[test]
    fn provider_statuses_cover_every_kind() {
        let statuses = BackupConfig::default().provider_statuses();
        assert_eq!(statuses.len(), ProviderKind::ALL.len());
        assert!(statuses[0].enabled);
        assert_eq!(statuses[0].name, ProviderKind::Local);
    }
}
