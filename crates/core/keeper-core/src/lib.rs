pub mod config;
pub mod credentials;
pub mod env;
pub mod error;
pub mod models;
pub mod policy;
pub mod ports;
pub mod runner;
pub mod schedule;

pub use config::FileConfigStore;
pub use error::{AppError, AppResult};
pub use models::{BackupConfig, BackupKind, BackupScheduleConfig, BackupTypeConfig, ProviderKind};
pub use policy::{ValidationReport, calculate_retention, generate_presets, validate_policy};
