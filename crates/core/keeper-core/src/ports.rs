//! Narrow interfaces to the collaborators this crate does not implement itself:
//! configuration persistence, the backup engine and user-facing notifications.

use crate::error::AppResult;
use crate::models::{BackupConfig, BackupKind, BackupRecord, ConfigPatch};
use crate::policy::ValidationReport;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Whole-document configuration persistence.
///
/// `save` overlays a partial document onto the stored one and rewrites it entirely.
/// Concurrent saves are last-write-wins.
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> impl Future<Output = AppResult<BackupConfig>> + Send;

    fn save(&self, patch: ConfigPatch) -> impl Future<Output = AppResult<BackupConfig>> + Send;
}

/// Status record returned by the backup engine for one run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BackupRunStatus {
    pub backup_type: BackupKind,
    pub success: bool,
    pub files_found: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub timestamp: String,
}

impl BackupRunStatus {
    /// Builds a status from the engine's line-oriented output: `✓` lines are files found,
    /// `✗`/`ERROR` lines are errors, `WARN` lines are warnings.
    pub fn from_output(backup_type: BackupKind, output: &str) -> Self {
        let mut status = Self {
            backup_type,
            success: true,
            files_found: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            timestamp: chrono::Local::now().to_rfc3339(),
        };

        for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if line.contains('✓') {
                status.files_found.push(line.to_string());
            } else if line.contains('✗') || line.contains("ERROR") {
                status.errors.push(line.to_string());
                status.success = false;
            } else if line.contains("WARN") {
                status.warnings.push(line.to_string());
            }
        }
        status
    }

    /// History entry for this run.
    pub fn record(&self) -> BackupRecord {
        BackupRecord {
            timestamp: self.timestamp.clone(),
            backup_type: self.backup_type,
            success: self.success,
            files: self.files_found.len(),
            errors: self.errors.len(),
        }
    }
}

/// The opaque "run backup" operation.
pub trait BackupRunner: Send + Sync {
    fn run_backup(
        &self,
        kind: BackupKind,
    ) -> impl Future<Output = AppResult<BackupRunStatus>> + Send;
}

/// Callback contract for surfacing results to the operator.
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    /// Errors are reported as errors, warnings as non-blocking notices.
    fn report(&self, context: &str, report: &ValidationReport) {
        for error in &report.errors {
            self.error(&format!("{}: {}", context, error));
        }
        for warning in &report.warnings {
            self.warning(&format!("{}: {}", context, warning));
        }
        if report.is_valid && report.warnings.is_empty() {
            self.success(&format!("{}: valid", context));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Notifier for Recorder {
        fn success(&self, message: &str) {
            self.0.borrow_mut().push(format!("ok {message}"));
        }
        fn error(&self, message: &str) {
            self.0.borrow_mut().push(format!("err {message}"));
        }
        fn warning(&self, message: &str) {
            self.0.borrow_mut().push(format!("warn {message}"));
        }
        fn info(&self, message: &str) {
            self.0.borrow_mut().push(format!("info {message}"));
        }
    }

    #[test]
    fn parses_engine_output() {
        let output = "Starting backup\n✓ /etc/hosts\n✓ /home/user\nWARNING: skipped socket\n✗ upload failed\n";
        let status = BackupRunStatus::from_output(BackupKind::Full, output);
        assert!(!status.success);
        assert_eq!(status.files_found.len(), 2);
        assert_eq!(status.warnings, vec!["WARNING: skipped socket"]);
        assert_eq!(status.errors, vec!["✗ upload failed"]);
    }

    #[test]
    fn record_counts_files_and_errors() {
        let status = BackupRunStatus::from_output(BackupKind::Differential, "✓ /etc\n✓ /srv\nERROR disk full\n");
        let record = status.record();
        assert_eq!(record.backup_type, BackupKind::Differential);
        assert!(!record.success);
        assert_eq!((record.files, record.errors), (2, 1));
        assert_eq!(record.timestamp, status.timestamp);
    }

    #[test]
    fn clean_output_is_success() {
        let status = BackupRunStatus::from_output(BackupKind::Incremental, "✓ /etc\n");
        assert!(status.success);
        assert!(status.errors.is_empty());
    }

    #[test]
    fn report_routes_errors_and_warnings() {
        let recorder = Recorder::default();
        recorder.report(
            "full",
            &ValidationReport {
                is_valid: false,
                errors: vec!["bad".into()],
                warnings: vec!["risky".into()],
            },
        );
        assert_eq!(*recorder.0.borrow(), vec!["err full: bad", "warn full: risky"]);

        let recorder = Recorder::default();
        recorder.report("full", &ValidationReport { is_valid: true, ..Default::default() });
        assert_eq!(*recorder.0.borrow(), vec!["ok full: valid"]);
    }
}
