//! Station identifiers.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// An opaque station key.
///
/// Stations carry no data of their own; they only key the graph. Numeric
/// identifiers (such as UIC stop numbers) are stored in their decimal form
/// so a single query never mixes key types. Deserialization accepts either
/// a string or a non-negative integer.
///
/// # Examples
///
/// ```
/// use reliable_transit::domain::StationId;
///
/// let bern = StationId::from("Bern");
/// assert_eq!(bern.as_str(), "Bern");
///
/// let uic = StationId::from(8507000_u64);
/// assert_eq!(uic.as_str(), "8507000");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Create a station key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for StationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for StationId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for StationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for StationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StationIdVisitor)
    }
}

struct StationIdVisitor;

impl Visitor<'_> for StationIdVisitor {
    type Value = StationId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a station name or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<StationId, E> {
        Ok(StationId::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<StationId, E> {
        Ok(StationId::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<StationId, E> {
        Ok(StationId::from(v))
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
