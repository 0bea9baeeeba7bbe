pub mod document;
pub mod history;
pub mod policy;
pub mod provider;
pub mod schedule;

pub use document::{BackupConfig, ConfigPatch, LogLevel, LoggingConfig};
pub use history::{BackupRecord, BackupStatistics, MAX_HISTORY, RunState};
pub use policy::{
    BackupKind, BackupTypeConfig, BackupTypes, CleanupPolicy, CompressionAlgorithm,
    CompressionPolicy, DedupAlgorithm, DeduplicationPolicy, EncryptionAlgorithm,
    EncryptionPolicy, PerformancePolicy, Priority, RetentionPolicy, SchedulingPolicy,
    VerificationFrequency, VerificationPolicy,
};
pub use provider::{
    Availability, CloudProviderConfig, ProviderKind, ProviderPatch, ProviderStatus, REDACTED,
};
pub use schedule::{BackupScheduleConfig, Frequency, ScheduleState, ScheduleStatus, TimerStatus};
