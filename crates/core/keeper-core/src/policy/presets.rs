use crate::models::{BackupKind, BackupTypeConfig, BackupTypes, PerformancePolicy, RetentionPolicy};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UseCase {
    Development,
    Production,
    Archive,
}

impl UseCase {
    pub const ALL: [UseCase; 3] = [Self::Development, Self::Production, Self::Archive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Archive => "archive",
        }
    }

    fn performance(&self) -> PerformancePolicy {
        let (parallel_jobs, chunk_size) = match self {
            Self::Development => (2, 50),
            Self::Production => (4, 100),
            Self::Archive => (8, 200),
        };
        PerformancePolicy {
            max_bandwidth: None,
            parallel_jobs,
            chunk_size,
        }
    }

    fn retention(&self, kind: BackupKind) -> RetentionPolicy {
        let (days, max_backups, keep_forever) = match (self, kind) {
            (Self::Development, BackupKind::Full) => (30, 5, false),
            (Self::Development, BackupKind::Incremental) => (14, 14, false),
            (Self::Development, BackupKind::Differential) => (21, 7, false),
            (Self::Production, BackupKind::Full) => (90, 12, false),
            (Self::Production, BackupKind::Incremental) => (30, 30, false),
            (Self::Production, BackupKind::Differential) => (60, 8, false),
            (Self::Archive, BackupKind::Full) => (365, 24, true),
            (Self::Archive, BackupKind::Incremental) => (90, 90, false),
            (Self::Archive, BackupKind::Differential) => (180, 26, false),
        };
        RetentionPolicy {
            days,
            max_backups: Some(max_backups),
            keep_forever,
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UseCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown use case: {}", s))
    }
}

pub fn preset_for(use_case: UseCase) -> BackupTypes {
    let build = |kind| {
        BackupTypeConfig::base(kind)
            .with_retention(use_case.retention(kind))
            .with_performance(use_case.performance())
    };
    BackupTypes {
        full: build(BackupKind::Full),
        incremental: build(BackupKind::Incremental),
        differential: build(BackupKind::Differential),
    }
}

/// Presets for a use-case tag. Unrecognized tags yield the base policy for every kind.
pub fn generate_presets(tag: &str) -> BackupTypes {
    match tag.parse::<UseCase>() {
        Ok(use_case) => preset_for(use_case),
        Err(e) => {
            warn!("{}, falling back to base policies", e);
            BackupTypes::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::validate_policy;

    #[test]
    fn archive_full_keeps_forever() {
        let presets = generate_presets("archive");
        assert!(presets.full.retention.keep_forever);
        assert!(!presets.incremental.retention.keep_forever);
    }

    #[test]
    fn development_incremental_keeps_two_weeks() {
        assert_eq!(generate_presets("development").incremental.retention.days, 14);
    }

    #[test]
    fn presets_scale_up_across_use_cases() {
        let [dev, prod, archive] = UseCase::ALL.map(preset_for);
        for kind in BackupKind::ALL {
            assert!(dev.get(kind).retention.days < prod.get(kind).retention.days);
            assert!(prod.get(kind).retention.days < archive.get(kind).retention.days);
            assert!(
                dev.get(kind).performance.parallel_jobs < prod.get(kind).performance.parallel_jobs
            );
            assert!(prod.get(kind).performance.chunk_size < archive.get(kind).performance.chunk_size);
        }
    }

    #[test]
    fn presets_share_base_policy_and_validate() {
        for use_case in UseCase::ALL {
            for policy in preset_for(use_case).iter() {
                assert_eq!(policy.compression.level, 6);
                assert_eq!(policy.cleanup.keep_at_least, 3);
                assert!(validate_policy(policy).is_valid, "{use_case} {}", policy.kind);
            }
        }
    }

    #[test]
    fn unknown_tag_falls_back_to_base() {
        assert_eq!(generate_presets("staging"), BackupTypes::default());
    }
}
