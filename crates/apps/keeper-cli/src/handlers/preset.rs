use crate::ui::{Layout, Messages};
use anyhow::Result;
use keeper_core::FileConfigStore;
use keeper_core::models::ConfigPatch;
use keeper_core::policy::{UseCase, preset_for};
use keeper_core::ports::{ConfigStore, Notifier};

pub async fn handle_preset(store: &FileConfigStore, use_case: UseCase, apply: bool) -> Result<()> {
    let layout = Layout::new();
    let types = preset_for(use_case);

    layout.header_dashboard(&format!("{} preset", use_case));
    for policy in types.iter() {
        let retention = &policy.retention;
        layout.section_timeline(&policy.kind.as_str()[..2], policy.kind.as_str());
        layout.row_labeled("◷", "Retention", &format!("{} days", retention.days));
        layout.row_labeled(
            "#",
            "Max Backups",
            &retention
                .max_backups
                .map_or_else(|| "none".to_string(), |m| m.to_string()),
        );
        layout.row_labeled(
            "∞",
            "Keep Forever",
            if retention.keep_forever { "yes" } else { "no" },
        );
        layout.row_labeled(
            "⇉",
            "Parallel Jobs",
            &policy.performance.parallel_jobs.to_string(),
        );
        layout.row_labeled(
            "◫",
            "Chunk Size",
            &format!("{} MB", policy.performance.chunk_size),
        );
        layout.section_end();
    }

    let messages = Messages::new();
    if apply {
        store
            .save(ConfigPatch {
                backup_types: Some(types),
                ..Default::default()
            })
            .await?;
        messages.success(&format!("Applied {} preset", use_case));
    } else {
        messages.hint(&format!("Use 'keeper preset {} --apply' to save it", use_case));
    }
    Ok(())
}
