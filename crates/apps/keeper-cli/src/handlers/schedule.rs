use crate::ScheduleAction;
use crate::ui::{Layout, Messages};
use anyhow::{Result, anyhow};
use keeper_core::FileConfigStore;
use keeper_core::models::{BackupScheduleConfig, ConfigPatch, ScheduleState};
use keeper_core::ports::{ConfigStore, Notifier};
use keeper_core::schedule::{
    ScheduleOption, ScheduleTemplates, describe_next_run, describe_schedule, schedule_status,
    templates, validate_schedule,
};

/// Parses `HH:MM` (24-hour).
pub fn parse_time(value: &str) -> Result<(u32, u32)> {
    let (hour, minute) = value
        .split_once(':')
        .ok_or_else(|| anyhow!("Time must be HH:MM, got: {}", value))?;
    let hour: u32 = hour.trim().parse()?;
    let minute: u32 = minute.trim().parse()?;
    if hour > 23 || minute > 59 {
        return Err(anyhow!("Time out of range: {}", value));
    }
    Ok((hour, minute))
}

fn show(schedule: &BackupScheduleConfig, last_run: Option<&str>) {
    let now = chrono::Local::now().naive_local();
    let layout = Layout::new();
    let preview = describe_schedule(schedule, now.date());
    let status = schedule_status(schedule, now, last_run.map(String::from));

    layout.header_dashboard("SCHEDULE");
    layout.section_timeline("sc", "Backup Schedule");
    layout.row_labeled(
        "◆",
        "State",
        match schedule.state() {
            ScheduleState::Enabled => "enabled",
            ScheduleState::Disabled => "disabled",
        },
    );
    layout.row_labeled("◇", "Timer", status.timer_status.as_str());
    layout.row_labeled("◷", "When", &preview.description);
    layout.row_labeled("◫", "Backup Type", schedule.active_backup_type.as_str());
    if let (Some(next), Some(at)) = (describe_next_run(schedule, now), &status.next_run) {
        layout.row_labeled("→", "Next Run", &format!("{} ({})", next, at));
    }
    layout.row_labeled("←", "Last Run", status.last_run.as_deref().unwrap_or("never"));
    layout.section_end();

    let messages = Messages::new();
    messages.report("schedule", &validate_schedule(schedule));
}

/// Editor choices as printable lines, one group per section.
fn template_lines(templates: &ScheduleTemplates) -> Vec<(&'static str, Vec<String>)> {
    let options = |list: &[ScheduleOption]| -> Vec<String> {
        list.iter()
            .map(|o| match &o.description {
                Some(description) => format!("{:<10} {} ({})", o.value, o.label, description),
                None => format!("{:<10} {}", o.value, o.label),
            })
            .collect()
    };
    vec![
        ("Frequencies", options(&templates.frequencies)),
        ("Time Slots", options(&templates.time_slots)),
        ("Weekdays", options(&templates.weekdays)),
        (
            "Cron Examples",
            templates
                .cron_examples
                .iter()
                .map(|(name, expr)| format!("{:<10} {}", expr, name))
                .collect(),
        ),
    ]
}

fn show_templates() {
    let layout = Layout::new();
    layout.header_dashboard("SCHEDULE TEMPLATES");
    for (title, lines) in template_lines(&templates()) {
        layout.section_timeline("tp", title);
        for line in lines {
            layout.item_simple(&line);
        }
        layout.section_end();
    }
}

pub async fn handle_schedule(store: &FileConfigStore, action: ScheduleAction) -> Result<()> {
    if let ScheduleAction::Templates = action {
        show_templates();
        return Ok(());
    }

    let config = store.load().await?;
    let current = config.schedule.clone().unwrap_or_default();
    let messages = Messages::new();

    let next = match action {
        ScheduleAction::Show => {
            show(&current, config.state.last_run());
            return Ok(());
        }
        ScheduleAction::Templates => return Ok(()),
        ScheduleAction::Toggle => current.toggled(),
        ScheduleAction::Set {
            frequency,
            day,
            time,
            cron,
            kind,
        } => {
            let mut next = current.clone();
            if let Some(frequency) = frequency {
                next.frequency = frequency;
            }
            if day.is_some() {
                next.day = day;
            }
            if let Some(time) = time {
                (next.hour, next.minute) = parse_time(&time)?;
            }
            if cron.is_some() {
                next.custom_cron = cron;
            }
            if let Some(kind) = kind {
                next.active_backup_type = kind;
            }
            next
        }
    };

    let saved = store
        .save(ConfigPatch {
            schedule: Some(next),
            ..Default::default()
        })
        .await?;
    let schedule = saved.schedule.unwrap_or_default();
    let preview = describe_schedule(&schedule, chrono::Local::now().date_naive());
    messages.success(&format!(
        "Schedule {}: {}",
        match schedule.state() {
            ScheduleState::Enabled => "enabled",
            ScheduleState::Disabled => "disabled",
        },
        preview.description
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_24_hour_time() {
        assert_eq!(parse_time("02:30").unwrap(), (2, 30));
        assert_eq!(parse_time("23:59").unwrap(), (23, 59));
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("2pm").is_err());
        assert!(parse_time("ab:cd").is_err());
    }

    #[test]
    fn templates_render_every_group() {
        let groups = template_lines(&templates());
        let titles: Vec<_> = groups.iter().map(|(title, _)| *title).collect();
        assert_eq!(
            titles,
            vec!["Frequencies", "Time Slots", "Weekdays", "Cron Examples"]
        );
        assert_eq!(groups[0].1.len(), 5);
        assert_eq!(groups[2].1.len(), 7);
        assert!(groups[3].1.iter().any(|line| line.starts_with("0 2 * * *")));
    }
}
