use crate::ui::Messages;
use anyhow::{Context, Result, bail};
use keeper_core::FileConfigStore;
use keeper_core::credentials::check_credentials;
use keeper_core::models::{ProviderKind, ProviderPatch};
use keeper_core::ports::Notifier;
use std::path::PathBuf;

/// Checks a pasted credentials file and, when it has the right shape, records its path
/// (and project id, if any) on the provider.
pub async fn handle_credentials(
    store: &FileConfigStore,
    provider: ProviderKind,
    file: PathBuf,
) -> Result<()> {
    let messages = Messages::new();

    if !matches!(
        provider,
        ProviderKind::GoogleDrive | ProviderKind::GoogleCloudStorage
    ) {
        bail!("{} does not use a credentials file", provider.display_name());
    }

    let raw = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let check = check_credentials(&raw, provider);
    if !check.valid {
        bail!(
            "{} is not a valid {} credentials file",
            file.display(),
            provider.display_name()
        );
    }

    let file = std::fs::canonicalize(&file).unwrap_or(file);
    store
        .update_provider(
            provider,
            ProviderPatch {
                credentials_file: Some(file.display().to_string()),
                project_id: check.project_id.clone(),
                ..Default::default()
            },
        )
        .await?;

    messages.success(&format!(
        "{} credentials saved",
        provider.display_name()
    ));
    if let Some(project_id) = check.project_id {
        messages.info(&format!("Project: {}", project_id));
    }
    Ok(())
}
