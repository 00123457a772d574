//! Error types for the binding adapter.

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors surfaced by the adapter's configuration and dispatch paths.
///
/// There is deliberately no silent-degradation mode: a missing layout
/// mapping never falls back to a default layout, so data-model/layout drift
/// becomes a visible failure instead of a half-bound row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// An item's runtime type has no registered layout mapping while the
    /// adapter is in per-type dispatch mode. Fatal to the current bind or
    /// type-tag call; no hook is invoked.
    #[error("no layout registered for item type '{type_name}'")]
    MissingLayoutMapping {
        /// Best-effort name of the unregistered type, for diagnostics.
        type_name: &'static str,
    },

    /// A unified position could not be classified into any region.
    ///
    /// This indicates an internal index-space bug (or a stale position held
    /// across a structural change), not a recoverable condition. It is
    /// surfaced as an error so the host owns the visible failure.
    #[error("unified position {position} is outside all regions (total count {total})")]
    PositionOutOfRange {
        /// The offending unified position.
        position: usize,
        /// The total slot count at the time of classification.
        total: usize,
    },

    /// Both the empty-state and load-more substitutes were requested.
    ///
    /// The two body substitutes are mutually exclusive by contract; the
    /// conflicting configuration is rejected and the prior one kept.
    #[error("empty-state and load-more substitutes are mutually exclusive")]
    AmbiguousMode,

    /// No empty-state or load-more item is configured for a substitute slot
    /// the widget asked to bind. Indicates configuration was torn down while
    /// the widget still holds stale positions.
    #[error("no substitute item configured for the {slot} slot")]
    MissingSubstitute {
        /// Which substitute slot was requested ("empty-state" or "load-more").
        slot: &'static str,
    },
}

/// Errors from [`ObservableList`](crate::ObservableList) mutations.
///
/// List errors are local and recoverable: the list is left unmodified and
/// the caller can retry with valid arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// A mutation referenced a position (or range) outside the list.
    #[error("position {position} out of range for list of length {len}")]
    OutOfRange {
        /// The offending position (range start for range operations).
        position: usize,
        /// The list length at the time of the call.
        len: usize,
    },
}

impl ListError {
    /// Create an out-of-range error.
    pub(crate) fn out_of_range(position: usize, len: usize) -> Self {
        Self::OutOfRange { position, len }
    }
}
