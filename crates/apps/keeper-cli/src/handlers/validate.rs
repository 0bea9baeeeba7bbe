use crate::ui::Messages;
use anyhow::{Result, bail};
use keeper_core::models::BackupConfig;
use keeper_core::policy::{ValidationReport, validate_document, validate_policy, validate_provider};
use keeper_core::ports::Notifier;
use keeper_core::schedule::validate_schedule;

/// Every check that applies to `config`, labelled for display.
pub fn collect_reports(config: &BackupConfig) -> Vec<(String, ValidationReport)> {
    let mut reports = vec![("document".to_string(), validate_document(config))];

    for policy in config.backup_types().iter() {
        reports.push((format!("{} policy", policy.kind), validate_policy(policy)));
    }
    for (kind, provider) in &config.providers {
        reports.push((
            format!("{} provider", kind.display_name()),
            validate_provider(*kind, provider),
        ));
    }
    if let Some(schedule) = &config.schedule {
        reports.push(("schedule".to_string(), validate_schedule(schedule)));
    }
    reports
}

pub fn handle_validate(config: &BackupConfig) -> Result<()> {
    let messages = Messages::new();
    let reports = collect_reports(config);

    for (context, report) in &reports {
        messages.report(context, report);
    }

    let failed = reports.iter().filter(|(_, r)| !r.is_valid).count();
    if failed > 0 {
        bail!("{} check(s) failed", failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keeper_core::models::ConfigPatch;
    use keeper_core::policy::preset_for;
    use keeper_core::policy::UseCase;

    #[test]
    fn default_document_passes() {
        let reports = collect_reports(&BackupConfig::default());
        assert!(reports.iter().all(|(_, r)| r.is_valid));
        // document + three policies + four providers
        assert_eq!(reports.len(), 8);
    }

    #[test]
    fn broken_policy_is_reported() {
        let mut types = preset_for(UseCase::Production);
        types.incremental.performance.parallel_jobs = 32;
        let config = BackupConfig {
            backup_types: Some(types),
            ..Default::default()
        };
        let failed: Vec<_> = collect_reports(&config)
            .into_iter()
            .filter(|(_, r)| !r.is_valid)
            .map(|(context, _)| context)
            .collect();
        assert_eq!(failed, vec!["incremental policy"]);
        assert!(BackupConfig::default()
            .apply(ConfigPatch {
                backup_types: config.backup_types,
                ..Default::default()
            })
            .is_err());
    }
}
