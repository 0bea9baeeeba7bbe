use crate::env::{self, SETTINGS_FILE};
use crate::error::{AppError, AppResult};
use crate::models::{BackupConfig, BackupRecord, ConfigPatch, ProviderKind, ProviderPatch};
use crate::ports::ConfigStore;
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// JSON configuration document on disk.
///
/// Reads go through `tokio::fs`; writes are atomic (tempfile in the same directory, then
/// rename) so a crash never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new(base_dir: &Path) -> Self {
        Self::at(base_dir.join(SETTINGS_FILE))
    }

    pub fn at(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Store at the settings path resolved from the environment.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self::at(env::get_settings_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn write_atomic(path: &Path, content: &str) -> AppResult<()> {
        let parent = path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| AppError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
        let temp = tempfile::NamedTempFile::new_in(parent).map_err(AppError::IoGeneric)?;
        std::fs::write(temp.path(), content).map_err(AppError::IoGeneric)?;
        temp.persist(path)
            .map_err(|e| AppError::IoGeneric(e.error))?;
        Ok(())
    }

    /// Overwrites the whole document.
    pub async fn write(&self, config: &BackupConfig) -> AppResult<()> {
        let content = serde_json::to_string_pretty(config)?;
        let path = self.config_path.clone();
        tokio::task::spawn_blocking(move || Self::write_atomic(&path, &content))
            .await
            .map_err(|e| AppError::Internal(format!("Config writer task failed: {}", e)))??;
        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Replaces the stored document with defaults.
    pub async fn reset(&self) -> AppResult<BackupConfig> {
        let config = BackupConfig::default();
        self.write(&config).await?;
        Ok(config)
    }

    pub async fn update_provider(
        &self,
        kind: ProviderKind,
        patch: ProviderPatch,
    ) -> AppResult<BackupConfig> {
        self.save(ConfigPatch {
            providers: Some(BTreeMap::from([(kind, patch)])),
            ..Default::default()
        })
        .await
    }

    /// Reads the stored document without creating one. `None` when nothing is stored yet.
    pub async fn peek(&self) -> AppResult<Option<BackupConfig>> {
        match tokio::fs::read_to_string(&self.config_path).await {
            Ok(content) => Ok(Some(self.parse(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io {
                path: self.config_path.clone(),
                source: e,
            }),
        }
    }

    fn parse(&self, content: &str) -> AppResult<BackupConfig> {
        serde_json::from_str(content).map_err(|e| {
            AppError::Config(format!(
                "Failed to parse {}: {}",
                self.config_path.display(),
                e
            ))
        })
    }

    /// Appends a run to the stored history. Successful runs also bump the backup counter.
    pub async fn record_run(&self, record: BackupRecord) -> AppResult<BackupConfig> {
        let config = self.load().await?.with_run_recorded(record);
        self.write(&config).await?;
        info!(
            "Recorded run; {} runs in history, backup count {}",
            config.state.backup_history.len(),
            config.backup_count
        );
        Ok(config)
    }
}

impl ConfigStore for FileConfigStore {
    /// Loads the document, writing defaults first if none exists. A document that fails to
    /// parse is an error rather than being silently replaced.
    async fn load(&self) -> AppResult<BackupConfig> {
        match tokio::fs::read_to_string(&self.config_path).await {
            Ok(content) => self.parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "No configuration at {}, writing defaults",
                    self.config_path.display()
                );
                let config = BackupConfig::default();
                self.write(&config).await?;
                Ok(config)
            }
            Err(e) => Err(AppError::Io {
                path: self.config_path.clone(),
                source: e,
            }),
        }
    }

    async fn save(&self, patch: ConfigPatch) -> AppResult<BackupConfig> {
        let current = self.load().await?;
        let next = current.apply(patch)?;
        self.write(&next).await?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn default_config_created_when_missing() {
        let dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(dir.path());
        let config = store.load().await.unwrap();
        assert_eq!(config.retention_days, 30);
        assert!(dir.path().join(SETTINGS_FILE).exists());
    }

    #[tokio::test]
    async fn config_persists_across_loads() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileConfigStore::new(dir.path());
            store
                .save(ConfigPatch {
                    retention_days: Some(7),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        let store = FileConfigStore::new(dir.path());
        assert_eq!(store.load().await.unwrap().retention_days, 7);
    }

    #[tokio::test]
    async fn rejected_patch_leaves_document_untouched() {
        let dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(dir.path());
        let before = store.load().await.unwrap();

        let result = store
            .save(ConfigPatch {
                retention_days: Some(0),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        let store = FileConfigStore::new(dir.path());
        assert!(matches!(store.load().await, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn reset_recovers_corrupt_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        let store = FileConfigStore::new(dir.path());
        let reset = store.reset().await.unwrap();
        assert_eq!(store.load().await.unwrap(), reset);
    }

    #[tokio::test]
    async fn peek_never_writes() {
        let dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(dir.path());
        assert_eq!(store.peek().await.unwrap(), None);
        assert!(!store.path().exists());

        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.peek().await, Err(AppError::Config(_))));
    }

    fn run(timestamp: &str, success: bool) -> BackupRecord {
        BackupRecord {
            timestamp: timestamp.to_string(),
            backup_type: crate::models::BackupKind::Incremental,
            success,
            files: 1,
            errors: usize::from(!success),
        }
    }

    #[tokio::test]
    async fn records_runs() {
        let dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(dir.path());
        store.record_run(run("2026-10-17T02:00:00", true)).await.unwrap();
        store.record_run(run("2026-10-18T02:00:00", false)).await.unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(config.backup_count, 1);
        assert_eq!(config.state.backup_history.len(), 2);
        assert_eq!(config.state.last_run(), Some("2026-10-18T02:00:00"));
        assert_eq!(
            config.state.last_daily_backup.as_deref(),
            Some("2026-10-17T02:00:00")
        );
    }
}
