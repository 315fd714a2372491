//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from graph lookup and search errors.

use super::StationId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Consecutive segments don't meet at the same station
    #[error("segment {index} departs from {found} but the previous one arrives at {expected}")]
    Disconnected {
        index: usize,
        expected: StationId,
        found: StationId,
    },
}
