// ============================================================================
// spark-property - View-Model Properties for Rust
// ============================================================================
//
// A thread-safe value cell that knows *why* it changed: programmatic updates
// and user actions travel on separate channels, and "current value, then
// changes" views are derived from both.
// ============================================================================

pub mod core;
pub mod primitives;
pub mod stream;

// Re-export core items at crate root for ergonomic access
pub use core::types::{ChangeReason, NoInfo, UpdateReason};

// Re-export primitives at crate root
pub use primitives::operators::{Acted, OptionalAction, OptionalProperty, OptionalUpdate, Updated};
pub use primitives::property::{property, ViewModelProperty};

// Re-export stream primitives
pub use stream::{Event, Observable, Sink, Subject, Subscription};

// =============================================================================
// TESTS
// =============================================================================
