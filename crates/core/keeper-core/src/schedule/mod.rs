pub mod describe;
pub mod validate;

pub use describe::{
    SchedulePreview, describe_next_run, describe_schedule, effective_day_of_month, format_time,
    last_day_of_month, next_run, schedule_status,
};
pub use validate::{ScheduleOption, ScheduleTemplates, templates, validate_schedule};
