// ============================================================================
// spark-property - Subscription
//
// RAII handle returned by every subscribe call. Dropping it (or calling
// unsubscribe) stops delivery to that one observer and nothing else.
// ============================================================================

/// Teardown closure run when a subscription ends.
type TeardownFn = Box<dyn FnOnce() + Send>;

/// Handle to a live stream subscription.
///
/// Delivery stops when the handle is dropped. Use [`Subscription::forget`]
/// to keep receiving events for as long as the source lives.
#[must_use = "dropping a Subscription immediately stops delivery"]
pub struct Subscription {
    teardowns: Vec<TeardownFn>,
}

impl Subscription {
    /// A subscription that ends by running `teardown`.
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardowns: vec![Box::new(teardown)],
        }
    }

    /// A subscription with nothing to tear down (e.g. the source had already
    /// completed when it was subscribed to).
    pub fn empty() -> Self {
        Self {
            teardowns: Vec::new(),
        }
    }

    /// Whether unsubscribing would still do anything.
    pub fn is_active(&self) -> bool {
        !self.teardowns.is_empty()
    }

    /// Combine two subscriptions into one handle that ends both.
    pub fn join(mut self, mut other: Subscription) -> Subscription {
        self.teardowns.append(&mut other.teardowns);
        self
    }

    /// Stop delivery now.
    pub fn unsubscribe(mut self) {
        self.run_teardowns();
    }

    /// Give up the handle without stopping delivery.
    pub fn forget(mut self) {
        self.teardowns.clear();
    }

    fn run_teardowns(&mut self) {
        // Reverse order, like nested scope cleanups.
        while let Some(teardown) = self.teardowns.pop() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardowns();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
