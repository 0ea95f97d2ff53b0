// ============================================================================
// spark-property - Primitives Module
// The view-model property and its operator shorthand
// ============================================================================

pub mod operators;
pub mod property;

// Re-export for convenience
pub use operators::{Acted, OptionalAction, OptionalProperty, OptionalUpdate, Updated};
pub use property::{property, ViewModelProperty};
