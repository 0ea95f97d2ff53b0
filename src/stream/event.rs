// ============================================================================
// spark-property - Stream Events
// ============================================================================

use std::sync::Arc;

/// A single notification delivered to a stream observer.
///
/// Streams deliver any number of `Next` values followed by at most one
/// `Completed`. Nothing is delivered after `Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<T> {
    Next(T),
    Completed,
}

impl<T> Event<T> {
    /// Transform the carried value, passing `Completed` through.
    pub fn map<R>(self, f: impl FnOnce(T) -> R) -> Event<R> {
        match self {
            Event::Next(value) => Event::Next(f(value)),
            Event::Completed => Event::Completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Event::Completed)
    }

    /// The carried value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Event::Next(value) => Some(value),
            Event::Completed => None,
        }
    }
}

/// Shared observer callback.
///
/// Sinks are `Arc`ed so a subject can snapshot its observer list cheaply and
/// release its lock before delivering.
pub type Sink<T> = Arc<dyn Fn(Event<T>) + Send + Sync>;
