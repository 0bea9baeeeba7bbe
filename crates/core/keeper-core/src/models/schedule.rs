use super::policy::BackupKind;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }

    /// Length of one scheduling period in days. Custom schedules are projected as daily.
    pub fn period_days(&self) -> u32 {
        match self {
            Self::Daily | Self::Custom => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
            Self::Yearly => 365,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "custom" => Ok(Self::Custom),
            other => Err(AppError::Config(format!("Unknown frequency: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    Disabled,
    Enabled,
}

/// The single active backup schedule.
///
/// `day` is only meaningful for weekly (0-6, Sunday first) and monthly (1-31) schedules.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupScheduleConfig {
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub hour: u32,
    pub minute: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_cron: Option<String>,
    pub active_backup_type: BackupKind,
    #[serde(default)]
    pub enabled: bool,
}

impl Default for BackupScheduleConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::Daily,
            day: None,
            hour: 2,
            minute: 0,
            custom_cron: None,
            active_backup_type: BackupKind::Full,
            enabled: false,
        }
    }
}

impl BackupScheduleConfig {
    pub fn state(&self) -> ScheduleState {
        if self.enabled {
            ScheduleState::Enabled
        } else {
            ScheduleState::Disabled
        }
    }

    /// The only state transition: an explicit operator toggle.
    pub fn toggled(&self) -> Self {
        Self {
            enabled: !self.enabled,
            ..self.clone()
        }
    }

    /// Flat string view used for the `schedule_config` field of [`ScheduleStatus`].
    pub fn to_config_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("frequency".to_string(), self.frequency.to_string());
        map.insert(
            "time".to_string(),
            format!("{:02}:{:02}", self.hour, self.minute),
        );
        if let Some(day) = self.day {
            map.insert("day".to_string(), day.to_string());
        }
        if let Some(cron) = &self.custom_cron {
            map.insert("cron_expression".to_string(), cron.clone());
        }
        map.insert(
            "active_backup_type".to_string(),
            self.active_backup_type.to_string(),
        );
        map.insert("enabled".to_string(), self.enabled.to_string());
        map
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Active,
    Inactive,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

/// Schedule document as reported by the backend timer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ScheduleStatus {
    pub timer_status: TimerStatus,
    pub next_run: Option<String>,
    pub last_run: Option<String>,
    #[serde(default)]
    pub schedule_config: BTreeMap<String, String>,
}
