//! Scheduled trip segments and their historical observations.

use serde::{Deserialize, Serialize};

use super::{Minutes, StationId, TripId};

/// One historical observation of a scheduled segment.
///
/// The departure and arrival come from the same operating day; the two
/// are never resampled independently. Serialized as a `[dep, arr]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(Minutes, Minutes)", into = "(Minutes, Minutes)")]
pub struct ActualTime {
    /// Observed departure.
    pub departure: Minutes,
    /// Observed arrival.
    pub arrival: Minutes,
}

impl ActualTime {
    /// Creates an observation from raw minute values.
    pub fn new(departure: impl Into<Minutes>, arrival: impl Into<Minutes>) -> Self {
        Self {
            departure: departure.into(),
            arrival: arrival.into(),
        }
    }
}

impl From<(Minutes, Minutes)> for ActualTime {
    fn from((departure, arrival): (Minutes, Minutes)) -> Self {
        Self { departure, arrival }
    }
}

impl From<ActualTime> for (Minutes, Minutes) {
    fn from(sample: ActualTime) -> Self {
        (sample.departure, sample.arrival)
    }
}

/// One scheduled movement of a single trip between two stops.
///
/// After consolidation a segment may also span several consecutive stops
/// of the same trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSegment {
    /// Boarding station.
    pub from: StationId,
    /// Alighting station.
    pub to: StationId,
    /// Scheduled departure from `from`.
    pub planned_departure: Minutes,
    /// Scheduled arrival at `to`. Equal to the departure for notional
    /// zero-duration segments.
    pub planned_arrival: Minutes,
    /// The run this segment belongs to.
    #[serde(default)]
    pub trip_id: Option<TripId>,
    /// Historical observations, in operating-day order.
    #[serde(default)]
    pub actual_times: Vec<ActualTime>,
}

impl TripSegment {
    /// Creates a segment.
    pub fn new(
        from: StationId,
        to: StationId,
        trip_id: Option<TripId>,
        planned_departure: Minutes,
        planned_arrival: Minutes,
        actual_times: Vec<ActualTime>,
    ) -> Self {
        Self {
            from,
            to,
            planned_departure,
            planned_arrival,
            trip_id,
            actual_times,
        }
    }

    /// The synthetic "still at the source" element that roots every
    /// partial itinerary.
    pub fn placeholder(station: StationId, time: Minutes) -> Self {
        Self {
            from: station.clone(),
            to: station,
            planned_departure: time,
            planned_arrival: time,
            trip_id: None,
            actual_times: Vec::new(),
        }
    }

    /// Returns true for a zero-length segment that starts and ends at the
    /// same station.
    pub fn is_placeholder(&self) -> bool {
        self.from == self.to
    }

    /// Scheduled duration of the segment.
    pub fn duration(&self) -> Minutes {
        self.planned_arrival - self.planned_departure
    }

    /// Iterates the observed departures.
    pub fn actual_departures(&self) -> impl Iterator<Item = Minutes> + '_ {
        self.actual_times.iter().map(|s| s.departure)
    }

    /// Iterates the observed arrivals.
    pub fn actual_arrivals(&self) -> impl Iterator<Item = Minutes> + '_ {
        self.actual_times.iter().map(|s| s.arrival)
    }

    /// Returns true if continuing onto `next` requires a transfer.
    pub fn needs_transfer_to(&self, next: &TripSegment) -> bool {
        super::is_transfer_needed(self.trip_id.as_ref(), next.trip_id.as_ref())
    }

    /// Joins this segment with the following segment of the same trip.
    ///
    /// The result spans `self.from` to `next.to`, keeps this segment's
    /// planned departure and takes the planned arrival of `next`.
    pub fn joined_with(&self, next: &TripSegment) -> TripSegment {
        TripSegment {
            from: self.from.clone(),
            to: next.to.clone(),
            planned_departure: self.planned_departure,
            planned_arrival: next.planned_arrival,
            trip_id: self.trip_id.clone().or_else(|| next.trip_id.clone()),
            actual_times: merge_actual_times(&self.actual_times, &next.actual_times),
        }
    }
}

/// Pairs the i-th departure of `first` with the i-th arrival of `second`.
///
/// The result has `min(first.len(), second.len())` samples.
///
/// This is an approximation: it assumes index `i` in both lists refers to
/// the same operating day. No date key is available to check that.
///
/// ```
/// use reliable_transit::domain::{ActualTime, merge_actual_times};
///
/// let a = [ActualTime::new(487, 505), ActualTime::new(490, 508)];
/// let b = [ActualTime::new(506, 516), ActualTime::new(509, 519)];
/// assert_eq!(
///     merge_actual_times(&a, &b),
///     vec![ActualTime::new(487, 516), ActualTime::new(490, 519)]
/// );
/// assert!(merge_actual_times(&[], &b).is_empty());
/// ```
pub fn merge_actual_times(first: &[ActualTime], second: &[ActualTime]) -> Vec<ActualTime> {
    first
        .iter()
        .zip(second)
        .map(|(a, b)| ActualTime {
            departure: a.departure,
            arrival: b.arrival,
        })
        .collect()
}
