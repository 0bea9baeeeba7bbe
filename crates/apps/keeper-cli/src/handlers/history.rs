use crate::ui::{Layout, Messages};
use anyhow::Result;
use keeper_core::models::{BackupConfig, BackupRecord};

fn run_line(record: &BackupRecord) -> String {
    let mut line = format!("{} · {} files", record.backup_type, record.files);
    if record.errors > 0 {
        line.push_str(&format!(" · {} errors", record.errors));
    }
    line
}

pub fn handle_history(config: &BackupConfig, limit: usize) -> Result<()> {
    let layout = Layout::new();
    let stats = config.statistics();

    layout.header_dashboard("HISTORY");
    layout.section_timeline("st", "Statistics");
    layout.row_labeled("#", "Recorded Runs", &stats.total_backups.to_string());
    layout.row_labeled(
        "◆",
        "Success Rate",
        &format!("{:.1}%", stats.backup_success_rate),
    );
    layout.row_labeled(
        "◷",
        "Last Success",
        stats.last_backup.as_deref().unwrap_or("never"),
    );
    layout.row_labeled(
        "◫",
        "Providers",
        &format!(
            "{} active / {} enabled",
            stats.providers_active, stats.providers_configured
        ),
    );
    layout.section_end();

    let recent = config.state.recent(limit);
    if recent.is_empty() {
        Messages::new().hint("No runs recorded yet. Use 'keeper run' to start one");
        return Ok(());
    }

    layout.section_timeline("rn", "Recent Runs");
    for record in recent.iter().rev() {
        layout.row_status(record.success, &record.timestamp, &run_line(record));
    }
    layout.section_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keeper_core::models::BackupKind;

    #[test]
    fn run_line_mentions_errors_only_when_present() {
        let mut record = BackupRecord {
            timestamp: "2026-10-18T02:00:00".to_string(),
            backup_type: BackupKind::Incremental,
            success: true,
            files: 12,
            errors: 0,
        };
        assert_eq!(run_line(&record), "incremental · 12 files");

        record.errors = 2;
        assert_eq!(run_line(&record), "incremental · 12 files · 2 errors");
    }
}
