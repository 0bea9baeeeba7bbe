pub mod presets;
pub mod retention;
pub mod validation;

pub use presets::{UseCase, generate_presets, preset_for};
pub use retention::{ProjectedCount, RetentionProjection, calculate_retention, generate_backup_summary};
pub use validation::{ValidationReport, validate_document, validate_policy, validate_provider};
