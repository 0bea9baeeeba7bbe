use crate::models::{BackupKind, BackupTypeConfig, Frequency};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of backups retained over the retention window.
///
/// `Unbounded` stands for "kept forever" and must be matched before doing arithmetic.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectedCount {
    Finite(u64),
    Unbounded,
}

impl ProjectedCount {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl fmt::Display for ProjectedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{}", n),
            Self::Unbounded => f.write_str("unlimited"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetentionProjection {
    pub backups_per_day: f64,
    pub total_backups_in_period: ProjectedCount,
    pub backup_frequency: String,
    pub storage_impact: String,
    pub restore_complexity: String,
}

pub fn frequency_phrase(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "every day",
        Frequency::Weekly => "once per week",
        Frequency::Monthly => "once per month",
        Frequency::Yearly => "once per year",
        Frequency::Custom => "on a custom schedule",
    }
}

/// Static (storage impact, restore complexity) labels per backup kind.
pub fn classification(kind: BackupKind) -> (&'static str, &'static str) {
    match kind {
        BackupKind::Full => ("Low impact with GFS rotation", "Simple (single file restore)"),
        BackupKind::Incremental => (
            "Lowest storage usage",
            "Complex (requires full + all incrementals)",
        ),
        BackupKind::Differential => (
            "Medium storage usage",
            "Simple (requires full + latest differential)",
        ),
    }
}

/// Backups accumulated over `days` before `max_backups` or `keep_forever` apply.
fn raw_total(config: &BackupTypeConfig, frequency: Frequency) -> u64 {
    // floor(days * 1/period) computed exactly in integers
    u64::from(config.retention.days) / u64::from(frequency.period_days())
}

pub fn calculate_retention(config: &BackupTypeConfig, frequency: Frequency) -> RetentionProjection {
    let mut total = raw_total(config, frequency);
    if let Some(max) = config.retention.max_backups {
        total = total.min(u64::from(max));
    }
    let total_backups_in_period = if config.retention.keep_forever {
        ProjectedCount::Unbounded
    } else {
        ProjectedCount::Finite(total)
    };
    let (storage_impact, restore_complexity) = classification(config.kind);

    RetentionProjection {
        backups_per_day: 1.0 / f64::from(frequency.period_days()),
        total_backups_in_period,
        backup_frequency: frequency_phrase(frequency).to_string(),
        storage_impact: storage_impact.to_string(),
        restore_complexity: restore_complexity.to_string(),
    }
}

/// One sentence describing what the retention settings mean in practice.
pub fn generate_backup_summary(config: &BackupTypeConfig, frequency: Frequency) -> String {
    let projection = calculate_retention(config, frequency);
    let kind = config.kind;

    if config.retention.keep_forever {
        return format!(
            "{} backups run {} and are kept forever.",
            capitalize(kind.as_str()),
            projection.backup_frequency
        );
    }

    let raw = raw_total(config, frequency);
    match config.retention.max_backups {
        Some(max) if u64::from(max) < raw => format!(
            "{} backups run {}; only the newest {} are kept (about {} would accumulate over {} days).",
            capitalize(kind.as_str()),
            projection.backup_frequency,
            max,
            raw,
            config.retention.days
        ),
        _ => format!(
            "{} backups run {}, keeping about {} backups over {} days.",
            capitalize(kind.as_str()),
            projection.backup_frequency,
            projection.total_backups_in_period,
            config.retention.days
        ),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
