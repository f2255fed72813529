//! Error types for dialectfix-edit.
//!
//! A scheduled plan is non-overlapping and in order by construction, so
//! every variant here points at a scheduler defect or a malformed receipt.
//! Rewriting drops the offending edit and keeps going.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The edit starts before the end of the previously applied edit.
    #[error("edit [{start}, {end}) starts before cursor {cursor}")]
    OutOfOrder {
        start: usize,
        end: usize,
        cursor: usize,
    },

    #[error("edit [{start}, {end}) ends before it starts")]
    Inverted { start: usize, end: usize },

    #[error("edit [{start}, {end}) exceeds buffer of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("edit [{start}, {end}) splits a character")]
    NotCharBoundary { start: usize, end: usize },
}

impl EditError {
    /// Offsets of the rejected edit.
    pub fn range(&self) -> (usize, usize) {
        match *self {
            EditError::OutOfOrder { start, end, .. }
            | EditError::Inverted { start, end }
            | EditError::OutOfBounds { start, end, .. }
            | EditError::NotCharBoundary { start, end } => (start, end),
        }
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::EditError;

    #[test]
    fn display_includes_offsets() {
        let err = EditError::OutOfOrder {
            start: 3,
            end: 5,
            cursor: 4,
        };
        assert_eq!(err.to_string(), "edit [3, 5) starts before cursor 4");
        assert_eq!(err.range(), (3, 5));
    }

    #[test]
    fn inverted_display() {
        let err = EditError::Inverted { start: 9, end: 2 };
        assert!(err.to_string().contains("ends before it starts"));
    }
}
