use crate::error::{AppError, AppResult};
use crate::policy::validate_policy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum BackupKind {
    Full,
    Incremental,
    Differential,
}

impl BackupKind {
    pub const ALL: [BackupKind; 3] = [Self::Full, Self::Incremental, Self::Differential];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Incremental => "incremental",
            Self::Differential => "differential",
        }
    }
}

impl fmt::Display for BackupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackupKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "incremental" => Ok(Self::Incremental),
            "differential" => Ok(Self::Differential),
            other => Err(AppError::Config(format!("Unknown backup type: {}", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    Gzip,
    Lz4,
    Zstd,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionAlgorithm {
    #[serde(rename = "AES-256-GCM")]
    Aes256Gcm,
    #[serde(rename = "AES-128-GCM")]
    Aes128Gcm,
    #[serde(rename = "ChaCha20-Poly1305")]
    ChaCha20Poly1305,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DedupAlgorithm {
    Blake2,
    Sha256,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationFrequency {
    EveryBackup,
    Weekly,
    Monthly,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// How long backups of one kind are kept.
///
/// When `keep_forever` is set, `days` and `max_backups` are advisory only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicy {
    pub days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backups: Option<u32>,
    #[serde(default)]
    pub keep_forever: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompressionPolicy {
    pub enabled: bool,
    pub algorithm: CompressionAlgorithm,
    pub level: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionPolicy {
    pub enabled: bool,
    pub algorithm: EncryptionAlgorithm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeduplicationPolicy {
    pub enabled: bool,
    pub algorithm: DedupAlgorithm,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPolicy {
    pub enabled: bool,
    pub frequency: VerificationFrequency,
    pub integrity_check: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePolicy {
    /// KB/s, `None` means unlimited.
    #[serde(default)]
    pub max_bandwidth: Option<f64>,
    pub parallel_jobs: u32,
    /// MB
    pub chunk_size: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPolicy {
    pub auto_cleanup: bool,
    pub cleanup_after_days: u32,
    pub keep_at_least: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingPolicy {
    pub priority: Priority,
    /// Seconds
    pub timeout: u64,
    pub retry_attempts: u32,
}

/// Full policy for one backup kind.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackupTypeConfig {
    #[serde(rename = "type")]
    pub kind: BackupKind,
    pub retention: RetentionPolicy,
    pub compression: CompressionPolicy,
    pub encryption: EncryptionPolicy,
    pub deduplication: DeduplicationPolicy,
    pub verification: VerificationPolicy,
    pub performance: PerformancePolicy,
    pub cleanup: CleanupPolicy,
    pub scheduling: SchedulingPolicy,
}

impl BackupTypeConfig {
    /// The shared base policy every preset starts from.
    pub fn base(kind: BackupKind) -> Self {
        Self {
            kind,
            retention: RetentionPolicy {
                days: 30,
                max_backups: Some(10),
                keep_forever: false,
            },
            compression: CompressionPolicy {
                enabled: true,
                algorithm: CompressionAlgorithm::Zstd,
                level: 6,
            },
            encryption: EncryptionPolicy {
                enabled: true,
                algorithm: EncryptionAlgorithm::Aes256Gcm,
                key_id: None,
            },
            deduplication: DeduplicationPolicy {
                enabled: true,
                algorithm: DedupAlgorithm::Blake2,
            },
            verification: VerificationPolicy {
                enabled: true,
                frequency: VerificationFrequency::Weekly,
                integrity_check: true,
            },
            performance: PerformancePolicy {
                max_bandwidth: None,
                parallel_jobs: 2,
                chunk_size: 64,
            },
            cleanup: CleanupPolicy {
                auto_cleanup: true,
                cleanup_after_days: 30,
                keep_at_least: 3,
            },
            scheduling: SchedulingPolicy {
                priority: Priority::Medium,
                timeout: 3600,
                retry_attempts: 3,
            },
        }
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_performance(mut self, performance: PerformancePolicy) -> Self {
        self.performance = performance;
        self
    }
}

/// One policy per backup kind.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackupTypes {
    pub full: BackupTypeConfig,
    pub incremental: BackupTypeConfig,
    pub differential: BackupTypeConfig,
}

impl Default for BackupTypes {
    fn default() -> Self {
        Self {
            full: BackupTypeConfig::base(BackupKind::Full),
            incremental: BackupTypeConfig::base(BackupKind::Incremental),
            differential: BackupTypeConfig::base(BackupKind::Differential),
        }
    }
}

impl BackupTypes {
    pub fn get(&self, kind: BackupKind) -> &BackupTypeConfig {
        match kind {
            BackupKind::Full => &self.full,
            BackupKind::Incremental => &self.incremental,
            BackupKind::Differential => &self.differential,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackupTypeConfig> {
        [&self.full, &self.incremental, &self.differential].into_iter()
    }

    /// One error per slot holding a policy whose `type` names a different kind.
    pub fn slot_errors(&self) -> Vec<String> {
        BackupKind::ALL
            .into_iter()
            .filter_map(|slot| {
                let held = self.get(slot).kind;
                (held != slot).then(|| {
                    format!("backupTypes.{} holds a policy of type {}", slot, held)
                })
            })
            .collect()
    }

    /// Returns a copy with `policy` stored under its own kind.
    ///
    /// Fails with [`AppError::Validation`] if the policy has validation errors; warnings
    /// never block the update.
    pub fn with_policy(&self, policy: BackupTypeConfig) -> AppResult<Self> {
        let report = validate_policy(&policy);
        if !report.is_valid {
            return Err(AppError::Validation(report.errors));
        }

        let mut next = self.clone();
        match policy.kind {
            BackupKind::Full => next.full = policy,
            BackupKind::Incremental => next.incremental = policy,
            BackupKind::Differential => next.differential = policy,
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_uses_persisted_field_names() {
        let json = serde_json::to_value(BackupTypeConfig::base(BackupKind::Full)).unwrap();
        assert_eq!(json["type"], "full");
        assert_eq!(json["retention"]["maxBackups"], 10);
        assert_eq!(json["retention"]["keepForever"], false);
        assert_eq!(json["encryption"]["algorithm"], "AES-256-GCM");
        assert_eq!(json["verification"]["frequency"], "weekly");
        assert_eq!(json["verification"]["integrityCheck"], true);
        assert_eq!(json["performance"]["parallelJobs"], 2);
        assert!(json["performance"]["maxBandwidth"].is_null());
        assert_eq!(json["cleanup"]["keepAtLeast"], 3);
        assert_eq!(json["scheduling"]["retryAttempts"], 3);
    }

    #[test]
    fn with_policy_replaces_only_matching_kind() {
        let types = BackupTypes::default();
        let mut policy = BackupTypeConfig::base(BackupKind::Incremental);
        policy.retention.days = 7;

        let updated = types.with_policy(policy).unwrap();
        assert_eq!(updated.incremental.retention.days, 7);
        assert_eq!(updated.full, types.full);
        assert_eq!(types.incremental.retention.days, 30);
    }

    #[test]
    fn with_policy_rejects_invalid_values() {
        let mut policy = BackupTypeConfig::base(BackupKind::Full);
        policy.performance.parallel_jobs = 0;

        let err = BackupTypes::default().with_policy(policy).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref errors) if errors.len() == 1));
    }

    #[test]
    fn slot_must_match_policy_kind() {
        assert!(BackupTypes::default().slot_errors().is_empty());

        let mut json = serde_json::to_value(BackupTypes::default()).unwrap();
        json["full"]["type"] = "incremental".into();
        let types: BackupTypes = serde_json::from_value(json).unwrap();
        assert_eq!(
            types.slot_errors(),
            vec!["backupTypes.full holds a policy of type incremental"]
        );
    }

    #[test]
    fn backup_kind_parses_case_insensitively() {
        assert_eq!("Differential".parse::<BackupKind>().unwrap(), BackupKind::Differential);
        assert!("snapshot".parse::<BackupKind>().is_err());
    }
}
