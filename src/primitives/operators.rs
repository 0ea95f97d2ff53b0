// ============================================================================
// spark-property - Directional Operators
//
// Shorthand for the two mutations:
//   &property << (value, info)    update
//   (value, info) >> &property    action
//   &property << Updated(value)   update, NoInfo metadata
//   Acted(value) >> &property     action, NoInfo metadata
//
// Every form yields the previous value. Optional properties get the same
// operations through the `Optional*` extension traits, which no-op and
// return `None` when the property is absent.
// ============================================================================

use std::ops::{Shl, Shr};

use crate::core::types::NoInfo;
use crate::primitives::property::ViewModelProperty;

// =============================================================================
// SINGLE-VALUE WRAPPERS
// =============================================================================

/// A value to store as a metadata-free update: `&property << Updated(v)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Updated<V>(pub V);

/// A value to store as a metadata-free action: `Acted(v) >> &property`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acted<V>(pub V);

// =============================================================================
// UPDATE: property << ...
// =============================================================================

impl<V, U, A> Shl<(V, U)> for &ViewModelProperty<V, U, A>
where
    V: Clone + Send + 'static,
    U: Clone + Send + 'static,
    A: Clone + Send + 'static,
{
    type Output = V;

    fn shl(self, (value, info): (V, U)) -> V {
        self.set_by_update(value, info)
    }
}

impl<V, A> Shl<Updated<V>> for &ViewModelProperty<V, NoInfo, A>
where
    V: Clone + Send + 'static,
    A: Clone + Send + 'static,
{
    type Output = V;

    fn shl(self, Updated(value): Updated<V>) -> V {
        self.update(value)
    }
}

// =============================================================================
// ACTION: ... >> property
// =============================================================================

impl<'a, V, U, A> Shr<&'a ViewModelProperty<V, U, A>> for (V, A)
where
    V: Clone + Send + 'static,
    U: Clone + Send + 'static,
    A: Clone + Send + 'static,
{
    type Output = V;

    fn shr(self, property: &'a ViewModelProperty<V, U, A>) -> V {
        let (value, info) = self;
        property.set_by_action(value, info)
    }
}

impl<'a, V, U> Shr<&'a ViewModelProperty<V, U, NoInfo>> for Acted<V>
where
    V: Clone + Send + 'static,
    U: Clone + Send + 'static,
{
    type Output = V;

    fn shr(self, property: &'a ViewModelProperty<V, U, NoInfo>) -> V {
        property.act(self.0)
    }
}

// =============================================================================
// OPTIONAL PROPERTIES
// =============================================================================

/// Mutations on a property that may not be there.
pub trait OptionalProperty<V, U, A> {
    /// `set_by_update` if present; `None` otherwise.
    fn update_if_present(self, value: V, info: U) -> Option<V>;

    /// `set_by_action` if present; `None` otherwise.
    fn act_if_present(self, value: V, info: A) -> Option<V>;
}

impl<V, U, A> OptionalProperty<V, U, A> for Option<&ViewModelProperty<V, U, A>>
where
    V: Clone + Send + 'static,
    U: Clone + Send + 'static,
    A: Clone + Send + 'static,
{
    fn update_if_present(self, value: V, info: U) -> Option<V> {
        self.map(|property| property.set_by_update(value, info))
    }

    fn act_if_present(self, value: V, info: A) -> Option<V> {
        self.map(|property| property.set_by_action(value, info))
    }
}

/// Metadata-free update on an optional property whose updates carry `NoInfo`.
pub trait OptionalUpdate<V> {
    fn update_value_if_present(self, value: V) -> Option<V>;
}

impl<V, A> OptionalUpdate<V> for Option<&ViewModelProperty<V, NoInfo, A>>
where
    V: Clone + Send + 'static,
    A: Clone + Send + 'static,
{
    fn update_value_if_present(self, value: V) -> Option<V> {
        self.map(|property| property.update(value))
    }
}

/// Metadata-free action on an optional property whose actions carry `NoInfo`.
pub trait OptionalAction<V> {
    fn act_value_if_present(self, value: V) -> Option<V>;
}

impl<V, U> OptionalAction<V> for Option<&ViewModelProperty<V, U, NoInfo>>
where
    V: Clone + Send + 'static,
    U: Clone + Send + 'static,
{
    fn act_value_if_present(self, value: V) -> Option<V> {
        self.map(|property| property.act(value))
    }
}

// =============================================================================
// TESTS
// =============================================================================
