// ============================================================================
// spark-property - Type Definitions
// Metadata sentinel and the tags that explain why a value arrived
// ============================================================================

// =============================================================================
// NO-METADATA SENTINEL
// =============================================================================

/// The "no extra information" metadata type.
///
/// `ViewModelProperty<V>` defaults both metadata parameters to `NoInfo`.
/// Metadata-free convenience forms (`update`, `act`, `Updated`, `Acted`)
/// only exist when the matching parameter is `NoInfo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoInfo;

// =============================================================================
// UPDATE REASON
// =============================================================================

/// Why a value arrived on an update view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpdateReason<U = NoInfo> {
    /// Synthetic event carrying the value at subscription time.
    Current,
    /// A real programmatic update, with its metadata.
    Update(U),
}

impl<U> UpdateReason<U> {
    /// Is this the synthetic subscription-time event?
    pub fn is_current(&self) -> bool {
        matches!(self, Self::Current)
    }

    /// Metadata of the update, `None` for `Current`.
    pub fn info(&self) -> Option<&U> {
        match self {
            Self::Current => None,
            Self::Update(info) => Some(info),
        }
    }
}

// =============================================================================
// CHANGE REASON
// =============================================================================

/// Why a value arrived on an all-changes view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeReason<U = NoInfo, A = NoInfo> {
    /// Synthetic event carrying the value at subscription time.
    Current,
    /// A programmatic update.
    Update(U),
    /// A user action.
    Action(A),
}

impl<U, A> ChangeReason<U, A> {
    pub fn is_current(&self) -> bool {
        matches!(self, Self::Current)
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }

    pub fn is_action(&self) -> bool {
        matches!(self, Self::Action(_))
    }
}

impl<U, A> From<UpdateReason<U>> for ChangeReason<U, A> {
    fn from(reason: UpdateReason<U>) -> Self {
        match reason {
            UpdateReason::Current => Self::Current,
            UpdateReason::Update(info) => Self::Update(info),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
