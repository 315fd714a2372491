//! Trip identifiers and the transfer rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one physical run of a vehicle.
///
/// All segments of the same run share a `TripId`; riding from one to the
/// next needs no transfer.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Create a trip identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TripId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({})", self.0)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if changing from trip `a` to trip `b` requires a transfer.
///
/// A transfer is needed only when both identifiers are present, non-empty
/// and different. A missing id (the synthetic source segment) never forces
/// a transfer.
///
/// ```
/// use reliable_transit::domain::{TripId, is_transfer_needed};
///
/// let ic6 = TripId::from("IC6");
/// let ic8 = TripId::from("IC8");
/// assert!(is_transfer_needed(Some(&ic6), Some(&ic8)));
/// assert!(!is_transfer_needed(Some(&ic8), Some(&ic8)));
/// assert!(!is_transfer_needed(None, Some(&ic8)));
/// ```
pub fn is_transfer_needed(a: Option<&TripId>, b: Option<&TripId>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.is_empty() && !b.is_empty() && a != b,
        _ => false,
    }
}
