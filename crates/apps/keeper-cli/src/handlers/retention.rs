use crate::ui::Layout;
use anyhow::Result;
use keeper_core::models::{BackupConfig, BackupKind, Frequency};
use keeper_core::policy::{calculate_retention, generate_backup_summary};

/// Projection frequency: explicit flag, else the configured schedule, else daily.
fn effective_frequency(config: &BackupConfig, frequency: Option<Frequency>) -> Frequency {
    frequency
        .or_else(|| config.schedule.as_ref().map(|s| s.frequency))
        .unwrap_or(Frequency::Daily)
}

pub fn handle_retention(
    config: &BackupConfig,
    kind: Option<BackupKind>,
    frequency: Option<Frequency>,
) -> Result<()> {
    let layout = Layout::new();
    let types = config.backup_types();
    let frequency = effective_frequency(config, frequency);
    let kinds: Vec<BackupKind> = match kind {
        Some(kind) => vec![kind],
        None => BackupKind::ALL.to_vec(),
    };

    layout.header_dashboard("RETENTION");
    for kind in kinds {
        let policy = types.get(kind);
        let projection = calculate_retention(policy, frequency);
        let retention = &policy.retention;

        layout.section_timeline(&kind.as_str()[..2], kind.as_str());
        layout.row_labeled("◷", "Retention", &format!("{} days", retention.days));
        layout.row_labeled(
            "#",
            "Max Backups",
            &retention
                .max_backups
                .map_or_else(|| "none".to_string(), |m| m.to_string()),
        );
        layout.row_labeled("◇", "Runs", &projection.backup_frequency);
        layout.row_labeled(
            "◫",
            "Backups Kept",
            &projection.total_backups_in_period.to_string(),
        );
        layout.row_labeled("◆", "Storage Impact", &projection.storage_impact);
        layout.row_labeled("↺", "Restore", &projection.restore_complexity);
        layout.item_simple(&generate_backup_summary(policy, frequency));
        layout.section_end();
    }
    Ok(())
}
