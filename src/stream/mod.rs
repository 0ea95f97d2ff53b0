// ============================================================================
// spark-property - Stream Primitives
//
// The minimal push-based stream toolkit the property is built on:
// - Event<T>       - Next(value) | Completed
// - Subject<T>     - hot multicast channel (the property's two channels)
// - Observable<T>  - cold stream description with map / merge / start_with
// - Subscription   - RAII handle, drop to stop delivery
// ============================================================================

pub mod event;
pub mod observable;
pub mod subject;
pub mod subscription;

pub use event::{Event, Sink};
pub use observable::Observable;
pub use subject::Subject;
pub use subscription::Subscription;
