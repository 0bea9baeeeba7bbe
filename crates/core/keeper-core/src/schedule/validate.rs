use super::describe::{WEEKDAYS, format_time};
use crate::models::{BackupScheduleConfig, Frequency};
use crate::policy::ValidationReport;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn validate_schedule(schedule: &BackupScheduleConfig) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if schedule.hour > 23 {
        errors.push("Hour must be between 0 and 23".to_string());
    }
    if schedule.minute > 59 {
        errors.push("Minute must be between 0 and 59".to_string());
    }

    match schedule.frequency {
        Frequency::Weekly => match schedule.day {
            None => errors.push("A weekday must be selected for weekly schedules".to_string()),
            Some(day) if day > 6 => {
                errors.push("Weekday must be between 0 (Sunday) and 6 (Saturday)".to_string())
            }
            Some(_) => {}
        },
        Frequency::Monthly => match schedule.day {
            None => errors.push("A day of month must be selected for monthly schedules".to_string()),
            Some(day) if !(1..=31).contains(&day) => {
                errors.push("Day of month must be between 1 and 31".to_string())
            }
            Some(day) if day > 28 => warnings.push(format!(
                "Day {} does not exist in every month; shorter months run on their last day",
                day
            )),
            Some(_) => {}
        },
        Frequency::Custom => {
            let cron = schedule.custom_cron.as_deref().unwrap_or("").trim();
            if cron.is_empty() {
                errors.push("A cron expression is required for custom schedules".to_string());
            } else if cron.split_whitespace().count() != 5 {
                errors.push(
                    "Cron expression must have 5 fields: minute hour day month weekday".to_string(),
                );
            }
        }
        Frequency::Daily | Frequency::Yearly => {}
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ScheduleOption {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ScheduleOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
        }
    }
}

/// Choices offered by the schedule editor.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ScheduleTemplates {
    pub frequencies: Vec<ScheduleOption>,
    pub time_slots: Vec<ScheduleOption>,
    pub weekdays: Vec<ScheduleOption>,
    pub cron_examples: BTreeMap<String, String>,
}

pub fn templates() -> ScheduleTemplates {
    let frequencies = [
        (Frequency::Daily, "Daily", "Run backup every day"),
        (Frequency::Weekly, "Weekly", "Run backup once per week"),
        (Frequency::Monthly, "Monthly", "Run backup once per month"),
        (Frequency::Yearly, "Yearly", "Run backup once per year"),
        (Frequency::Custom, "Custom Cron", "Use custom cron expression"),
    ]
    .into_iter()
    .map(|(frequency, label, description)| ScheduleOption {
        description: Some(description.to_string()),
        ..ScheduleOption::new(frequency.as_str(), label)
    })
    .collect();

    let time_slots = (0..=6)
        .map(|hour| {
            let label = if hour == 0 {
                "Midnight".to_string()
            } else {
                format_time(hour, 0)
            };
            ScheduleOption::new(format!("{:02}:00", hour), label)
        })
        .collect();

    let weekdays = WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, name)| ScheduleOption::new(i.to_string(), *name))
        .collect();

    let cron_examples = [
        ("daily_at_2am", "0 2 * * *"),
        ("weekly_monday_3am", "0 3 * * 1"),
        ("monthly_first_4am", "0 4 1 * *"),
        ("every_6_hours", "0 */6 * * *"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    ScheduleTemplates {
        frequencies,
        time_slots,
        weekdays,
        cron_examples,
    }
}
