use super::policy::BackupKind;
use serde::{Deserialize, Serialize};

/// Runs kept in the document; older entries are dropped first.
pub const MAX_HISTORY: usize = 50;

/// One completed (or failed) backup run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub timestamp: String,
    pub backup_type: BackupKind,
    pub success: bool,
    #[serde(default)]
    pub files: usize,
    #[serde(default)]
    pub errors: usize,
}

/// Run state persisted alongside the configuration under `state`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RunState {
    pub backup_history: Vec<BackupRecord>,
    /// Timestamp of the latest successful run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_daily_backup: Option<String>,
}

impl RunState {
    pub fn is_empty(&self) -> bool {
        self.backup_history.is_empty() && self.last_daily_backup.is_none()
    }

    pub fn recorded(&self, record: BackupRecord) -> Self {
        let mut next = self.clone();
        if record.success {
            next.last_daily_backup = Some(record.timestamp.clone());
        }
        next.backup_history.push(record);
        let excess = next.backup_history.len().saturating_sub(MAX_HISTORY);
        next.backup_history.drain(..excess);
        next
    }

    /// Timestamp of the latest run, successful or not.
    pub fn last_run(&self) -> Option<&str> {
        self.backup_history.last().map(|r| r.timestamp.as_str())
    }

    /// Newest `limit` runs, oldest first.
    pub fn recent(&self, limit: usize) -> &[BackupRecord] {
        let start = self.backup_history.len().saturating_sub(limit);
        &self.backup_history[start..]
    }

    /// Percentage of recorded runs that succeeded; 0 with no history.
    pub fn success_rate(&self) -> f64 {
        if self.backup_history.is_empty() {
            return 0.0;
        }
        let successful = self.backup_history.iter().filter(|r| r.success).count();
        successful as f64 / self.backup_history.len() as f64 * 100.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackupStatistics {
    pub total_backups: usize,
    pub last_backup: Option<String>,
    pub providers_active: usize,
    pub providers_configured: usize,
    pub backup_success_rate: f64,
}
