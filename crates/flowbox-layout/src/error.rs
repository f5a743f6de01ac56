//! Layout errors.
//!
//! Every error here means the box tree or the calling sequence was
//! inconsistent. None are retried; a failed pass leaves partial geometry
//! that must not be read.

use crate::layout::BoxId;

/// Errors raised while building or laying out a box tree.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A used value was read before the step that resolves it ran.
    #[error("used value not ready: {what} of box {id} was read before it was resolved")]
    UsedValueNotReady {
        /// The box whose value was read.
        id: BoxId,
        /// Which value was read.
        what: &'static str,
    },

    /// An internal invariant of the layout algorithm was violated.
    #[error("structural invariant violated: {0}")]
    StructuralInvariant(String),

    /// A dispatch met a box of a kind it cannot handle.
    #[error("box {id} is not a {expected}")]
    UnexpectedBoxKind {
        /// The offending box.
        id: BoxId,
        /// The kind the dispatch required.
        expected: &'static str,
    },

    /// The box description handed to the tree builder is inconsistent.
    #[error("invalid box tree: {0}")]
    InvalidTree(String),
}

/// Result alias used throughout the engine.
pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
