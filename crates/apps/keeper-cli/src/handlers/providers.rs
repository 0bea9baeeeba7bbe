use crate::ui::Layout;
use anyhow::Result;
use keeper_core::models::BackupConfig;

pub fn handle_providers(config: &BackupConfig) -> Result<()> {
    let layout = Layout::new();

    layout.header_dashboard("PROVIDERS");
    layout.section_timeline("pv", "Storage");
    for status in config.provider_statuses() {
        let mut detail = vec![if status.enabled { "enabled" } else { "disabled" }];
        detail.push(if status.configured {
            "configured"
        } else {
            "needs setup"
        });
        if !status.available {
            detail.push("coming soon");
        }
        layout.row_status(
            status.enabled && status.configured,
            &format!("{} {}", status.icon, status.display_name),
            &detail.join(" · "),
        );
    }
    layout.section_end();
    layout.badge_info(
        "TIP",
        "Use 'keeper validate' to check provider settings",
    );
    Ok(())
}
