// ============================================================================
// spark-property - Core Module
// Metadata sentinel and reason tags shared by the property and its views
// ============================================================================

pub mod types;

// Re-export commonly used items
pub use types::{ChangeReason, NoInfo, UpdateReason};
