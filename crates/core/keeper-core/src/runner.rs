use crate::error::{AppError, AppResult};
use crate::models::BackupKind;
use crate::ports::{BackupRunStatus, BackupRunner};
use log::{error, info};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Runs the external backup engine as `<program> [args..] create --type <kind>`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl BackupRunner for ProcessRunner {
    async fn run_backup(&self, kind: BackupKind) -> AppResult<BackupRunStatus> {
        info!(
            "Starting {} backup via {}",
            kind,
            self.program.display()
        );

        let child = Command::new(&self.program)
            .args(&self.args)
            .args(["create", "--type", kind.as_str()])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AppError::Runner(format!(
                    "Failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                AppError::Runner(format!(
                    "Backup timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(AppError::IoGeneric)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut status = BackupRunStatus::from_output(kind, &stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            status.success = false;
            status.errors.push(if detail.is_empty() {
                format!("Backup engine exited with {}", output.status)
            } else {
                detail.to_string()
            });
            error!("{} backup failed: {}", kind, status.errors.join("; "));
        } else {
            info!(
                "{} backup finished: {} files, {} warnings",
                kind,
                status.files_found.len(),
                status.warnings.len()
            );
        }

        Ok(status)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> ProcessRunner {
        // `sh -c <script> <$0> create --type <kind>`
        ProcessRunner::new("sh").with_args(["-c", script, "engine"])
    }

    #[tokio::test]
    async fn passes_backup_type_to_engine() {
        let runner = shell(r#"echo "✓ $3""#);
        let status = runner.run_backup(BackupKind::Differential).await.unwrap();
        assert!(status.success);
        assert_eq!(status.files_found, vec!["✓ differential"]);
        assert_eq!(status.backup_type, BackupKind::Differential);
    }

    #[tokio::test]
    async fn non_zero_exit_marks_failure() {
        let runner = shell("echo disk full >&2; exit 3");
        let status = runner.run_backup(BackupKind::Full).await.unwrap();
        assert!(!status.success);
        assert_eq!(status.errors, vec!["disk full"]);
    }

    #[tokio::test]
    async fn times_out() {
        let runner = shell("sleep 5").with_timeout(Duration::from_millis(100));
        let result = runner.run_backup(BackupKind::Full).await;
        assert!(matches!(result, Err(AppError::Runner(_))));
    }

    #[tokio::test]
    async fn missing_program_is_runner_error() {
        let runner = ProcessRunner::new("/nonexistent/keeper-engine");
        let result = runner.run_backup(BackupKind::Full).await;
        assert!(matches!(result, Err(AppError::Runner(_))));
    }
}
