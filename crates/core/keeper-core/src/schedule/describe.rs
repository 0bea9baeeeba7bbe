use crate::models::{BackupScheduleConfig, Frequency, ScheduleState, ScheduleStatus, TimerStatus};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Sunday-first, matching the weekly `day` index.
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SchedulePreview {
    pub description: String,
    pub time: String,
    /// Day of month actually used for the reference month (monthly only).
    pub effective_day: Option<u32>,
}

/// `14:05` -> `2:05 PM`, `0:00` -> `12:00 AM`.
pub fn format_time(hour: u32, minute: u32) -> String {
    let period = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, period)
}

pub fn weekday_name(day: u32) -> Option<&'static str> {
    WEEKDAYS.get(day as usize).copied()
}

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Requested day clamped into the given month: day 31 in a 30-day month lands on the 30th.
pub fn effective_day_of_month(day: u32, year: i32, month: u32) -> u32 {
    day.clamp(1, last_day_of_month(year, month))
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Human-readable preview of `schedule`; monthly days are resolved against the month of
/// `reference`.
pub fn describe_schedule(schedule: &BackupScheduleConfig, reference: NaiveDate) -> SchedulePreview {
    let time = format_time(schedule.hour, schedule.minute);
    let mut effective_day = None;

    let description = match schedule.frequency {
        Frequency::Daily => format!("Daily at {}", time),
        Frequency::Weekly => match schedule.day.and_then(weekday_name) {
            Some(name) => format!("Weekly on {} at {}", name, time),
            None => format!("Weekly (no day selected) at {}", time),
        },
        Frequency::Monthly => match schedule.day {
            Some(day) => {
                let effective = effective_day_of_month(day, reference.year(), reference.month());
                effective_day = Some(effective);
                if effective < day {
                    format!(
                        "Monthly on the {} at {} (last day of {})",
                        ordinal(effective),
                        time,
                        MONTHS[reference.month0() as usize]
                    )
                } else {
                    format!("Monthly on the {} at {}", ordinal(effective), time)
                }
            }
            None => format!("Monthly (no day selected) at {}", time),
        },
        Frequency::Yearly => format!("Yearly at {}", time),
        Frequency::Custom => match schedule.custom_cron.as_deref().map(str::trim) {
            Some(cron) if !cron.is_empty() => format!("Custom: {}", cron),
            _ => "Custom schedule not configured".to_string(),
        },
    };

    SchedulePreview {
        description,
        time,
        effective_day,
    }
}

fn at(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

fn monthly_candidate(date: NaiveDate, day: u32, time: NaiveTime) -> Option<NaiveDateTime> {
    let effective = effective_day_of_month(day, date.year(), date.month());
    date.with_day(effective).map(|d| at(d, time))
}

/// Next concrete run strictly after `now`. Yearly and custom schedules have no day
/// resolution and return `None`, as do out-of-range times or missing days.
pub fn next_run(schedule: &BackupScheduleConfig, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let time = NaiveTime::from_hms_opt(schedule.hour, schedule.minute, 0)?;
    let today = now.date();

    match schedule.frequency {
        Frequency::Daily => {
            let candidate = at(today, time);
            Some(if candidate > now {
                candidate
            } else {
                candidate + Duration::days(1)
            })
        }
        Frequency::Weekly => {
            let target = schedule.day.filter(|d| *d < 7)?;
            let current = today.weekday().num_days_from_sunday();
            let ahead = (target + 7 - current) % 7;
            let candidate = at(today + Duration::days(i64::from(ahead)), time);
            Some(if candidate > now {
                candidate
            } else {
                candidate + Duration::days(7)
            })
        }
        Frequency::Monthly => {
            let day = schedule.day.filter(|d| (1..=31).contains(d))?;
            let this_month = monthly_candidate(today, day, time)?;
            if this_month > now {
                return Some(this_month);
            }
            let first = today.with_day(1)?.checked_add_months(Months::new(1))?;
            monthly_candidate(first, day, time)
        }
        Frequency::Yearly | Frequency::Custom => None,
    }
}

/// "Saturday, February 28 2026 at 2:00 AM"
pub fn describe_next_run(schedule: &BackupScheduleConfig, now: NaiveDateTime) -> Option<String> {
    next_run(schedule, now).map(|next| {
        format!(
            "{}, {} {} {} at {}",
            WEEKDAYS[next.weekday().num_days_from_sunday() as usize],
            MONTHS[next.month0() as usize],
            next.day(),
            next.year(),
            format_time(schedule.hour, schedule.minute)
        )
    })
}

/// Local view of the timer: an enabled schedule is `Active` with its next run, a disabled one
/// is `Inactive`.
pub fn schedule_status(
    schedule: &BackupScheduleConfig,
    now: NaiveDateTime,
    last_run: Option<String>,
) -> ScheduleStatus {
    let (timer_status, next) = match schedule.state() {
        ScheduleState::Enabled => (
            TimerStatus::Active,
            next_run(schedule, now).map(|n| n.format("%Y-%m-%dT%H:%M:%S").to_string()),
        ),
        ScheduleState::Disabled => (TimerStatus::Inactive, None),
    };
    ScheduleStatus {
        timer_status,
        next_run: next,
        last_run,
        schedule_config: schedule.to_config_map(),
    }
}
