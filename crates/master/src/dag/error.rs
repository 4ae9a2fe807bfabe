//! DAG-specific error types

use std::fmt::Debug;

use thiserror::Error;

/// DAG-specific error types, carrying the offending payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DagError<T> {
    #[error("payload {0:?} already exists in the DAG")]
    DuplicatePayload(T),

    #[error("parent {parent:?} of {payload:?} does not exist in the DAG")]
    MissingParent { payload: T, parent: T },

    #[error("payload {0:?} does not exist in the DAG")]
    NotFound(T),

    #[error("payload {payload:?} is not a leaf ({children} children)")]
    NotLeaf { payload: T, children: usize },

    #[error("payloads not resolved in the DAG: {0:?}")]
    IncompleteSelection(Vec<T>),
}

impl<T> DagError<T> {
    pub const fn duplicate_payload(payload: T) -> Self {
        Self::DuplicatePayload(payload)
    }

    pub const fn missing_parent(payload: T, parent: T) -> Self {
        Self::MissingParent { payload, parent }
    }

    pub const fn not_found(payload: T) -> Self {
        Self::NotFound(payload)
    }

    pub const fn not_leaf(payload: T, children: usize) -> Self {
        Self::NotLeaf { payload, children }
    }

    pub const fn incomplete_selection(unresolved: Vec<T>) -> Self {
        Self::IncompleteSelection(unresolved)
    }
}

impl<T: Debug> From<DagError<T>> for strata_core::Error {
    fn from(err: DagError<T>) -> Self {
        Self::invalid_record(err.to_string())
    }
}

/// Result type for DAG operations over payload type `P`.
pub type DagResult<R, P> = std::result::Result<R, DagError<P>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parent_names_both_payloads() {
        let err = DagError::missing_parent("job-e", "job-z");
        let rendered = err.to_string();
        assert!(rendered.contains("job-e"));
        assert!(rendered.contains("job-z"));
    }

    #[test]
    fn test_converts_to_core_invalid_record() {
        let err: strata_core::Error = DagError::not_leaf("a".to_string(), 2).into();
        assert!(matches!(err, strata_core::Error::InvalidRecord { .. }));
        assert!(err.to_string().contains("not a leaf"));
    }
}
