//! Itinerary types.
//!
//! An `Itinerary` is the shared result shape of both searches: an ordered,
//! connected sequence of trip segments from an origin to a destination.

use std::fmt;

use serde::Serialize;

use super::{DomainError, Minutes, StationId, TripSegment};

/// A connected sequence of trip segments.
///
/// # Invariants
///
/// - Consecutive segments connect (`to` of one is `from` of the next)
/// - No synthetic placeholder segments
///
/// An empty itinerary is valid and represents "no path".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Itinerary {
    legs: Vec<TripSegment>,
}

impl Itinerary {
    /// Builds an itinerary, dropping a leading placeholder segment.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Disconnected`] if two consecutive segments do
    /// not meet at the same station.
    ///
    /// # Examples
    ///
    /// ```
    /// use reliable_transit::domain::{Itinerary, Minutes, TripSegment};
    ///
    /// let legs = vec![
    ///     TripSegment::placeholder("Bern".into(), Minutes::new(400)),
    ///     TripSegment::new("Bern".into(), "Thun".into(), Some("IC8".into()),
    ///         Minutes::new(487), Minutes::new(505), vec![]),
    /// ];
    /// let itinerary = Itinerary::new(legs).unwrap();
    /// assert_eq!(itinerary.len(), 1);
    /// assert_eq!(itinerary.origin().unwrap().as_str(), "Bern");
    /// ```
    pub fn new(mut legs: Vec<TripSegment>) -> Result<Self, DomainError> {
        if legs.first().is_some_and(TripSegment::is_placeholder) {
            legs.remove(0);
        }

        for (index, pair) in legs.windows(2).enumerate() {
            if pair[0].to != pair[1].from {
                return Err(DomainError::Disconnected {
                    index: index + 1,
                    expected: pair[0].to.clone(),
                    found: pair[1].from.clone(),
                });
            }
        }

        Ok(Self { legs })
    }

    /// The empty itinerary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the legs in travel order.
    pub fn legs(&self) -> &[TripSegment] {
        &self.legs
    }

    /// Consumes the itinerary, returning its legs.
    pub fn into_legs(self) -> Vec<TripSegment> {
        self.legs
    }

    /// Number of legs.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Returns true when the itinerary has no legs.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Station the itinerary starts from.
    pub fn origin(&self) -> Option<&StationId> {
        self.legs.first().map(|leg| &leg.from)
    }

    /// Station the itinerary ends at.
    pub fn destination(&self) -> Option<&StationId> {
        self.legs.last().map(|leg| &leg.to)
    }

    /// Scheduled departure of the first leg.
    pub fn departure_time(&self) -> Option<Minutes> {
        self.legs.first().map(|leg| leg.planned_departure)
    }

    /// Scheduled arrival of the last leg.
    pub fn arrival_time(&self) -> Option<Minutes> {
        self.legs.last().map(|leg| leg.planned_arrival)
    }

    /// Number of changes between different trips.
    pub fn transfer_count(&self) -> usize {
        self.legs
            .windows(2)
            .filter(|pair| pair[0].needs_transfer_to(&pair[1]))
            .count()
    }

    /// Returns a copy with consecutive same-trip legs merged.
    pub fn consolidated(&self) -> Self {
        Self {
            legs: consolidate_path(&self.legs),
        }
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.legs.is_empty() {
            return f.write_str("(no path)");
        }

        for (i, leg) in self.legs.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let trip = leg.trip_id.as_ref().map_or("?", |t| t.as_str());
            write!(
                f,
                "Take {trip} from {} to {} at {} and arrive at {}",
                leg.from, leg.to, leg.planned_departure, leg.planned_arrival
            )?;
        }
        Ok(())
    }
}

/// Merges maximal runs of consecutive segments on the same trip.
///
/// Each run becomes one segment spanning the run, with planned times from
/// its first and last segment and actual times paired up with
/// [`merge_actual_times`](super::merge_actual_times). Segments without a
/// trip id are never merged. Inputs of length 0 or 1 come back unchanged.
pub fn consolidate_path(segments: &[TripSegment]) -> Vec<TripSegment> {
    if segments.len() <= 1 {
        return segments.to_vec();
    }

    let mut result: Vec<TripSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match result.last_mut() {
            Some(tail) if same_trip(tail, segment) => {
                *tail = tail.joined_with(segment);
            }
            _ => result.push(segment.clone()),
        }
    }
    result
}

fn same_trip(a: &TripSegment, b: &TripSegment) -> bool {
    a.to == b.from
        && a.trip_id
            .as_ref()
            .is_some_and(|id| !id.is_empty() && Some(id) == b.trip_id.as_ref())
}
