use crate::ui::Messages;
use anyhow::{Result, bail};
use keeper_core::FileConfigStore;
use keeper_core::models::BackupKind;
use keeper_core::ports::{BackupRunner, ConfigStore, Notifier};
use keeper_core::runner::ProcessRunner;
use std::path::PathBuf;

/// Overrides the backup engine executable.
pub const ENV_ENGINE: &str = "KEEPER_ENGINE";
const DEFAULT_ENGINE: &str = "keeper-engine";

fn engine_path(engine: Option<PathBuf>) -> PathBuf {
    engine
        .or_else(|| std::env::var_os(ENV_ENGINE).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE))
}

pub async fn handle_run(
    store: &FileConfigStore,
    kind: Option<BackupKind>,
    engine: Option<PathBuf>,
) -> Result<()> {
    let messages = Messages::new();
    let config = store.load().await?;
    let kind = kind
        .or_else(|| config.schedule.as_ref().map(|s| s.active_backup_type))
        .unwrap_or(BackupKind::Full);

    if config.enabled_providers().is_empty() {
        messages.warning("No storage provider is enabled");
    }

    let runner = ProcessRunner::new(engine_path(engine));
    messages.info(&format!("Running {} backup...", kind));
    let status = runner.run_backup(kind).await?;

    for warning in &status.warnings {
        messages.warning(warning);
    }
    for error in &status.errors {
        messages.error(error);
    }

    let recorded = store.record_run(status.record()).await?;
    if !status.success {
        bail!("{} backup failed", kind);
    }
    messages.success(&format!(
        "{} backup complete: {} items, backup #{}",
        kind,
        status.files_found.len(),
        recorded.backup_count
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_engine_wins() {
        assert_eq!(
            engine_path(Some(PathBuf::from("/opt/engine"))),
            PathBuf::from("/opt/engine")
        );
    }
}
