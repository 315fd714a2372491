//! Earliest-arrival search.
//!
//! A time-dependent Dijkstra: labels are keyed by arrival time, and a
//! segment can be boarded if it departs at or after the label's arrival, or
//! `transfer_time` after it when changing to a different trip.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use super::search::{JourneyRequest, Planner, SearchError};
use crate::domain::{Itinerary, Minutes, StationId, TripId, TripSegment, is_transfer_needed};

/// Result of the earliest-arrival search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarliestArrival {
    /// Earliest scheduled arrival, or [`Minutes::INFINITY`].
    pub arrival_time: Minutes,

    /// One optimal path, consolidated. Empty when unreachable.
    pub path: Itinerary,
}

impl EarliestArrival {
    /// The result for an unreachable destination.
    pub fn unreachable() -> Self {
        Self {
            arrival_time: Minutes::INFINITY,
            path: Itinerary::empty(),
        }
    }

    /// Returns true if the destination was reached.
    pub fn is_reachable(&self) -> bool {
        !self.arrival_time.is_infinite()
    }
}

/// Queue entry: being at `station` at `arrival`, having come on `trip`.
#[derive(Debug, PartialEq, Eq)]
struct ArrivalLabel<'g> {
    arrival: Minutes,
    /// Insertion order, so equal arrivals pop first-in first-out.
    seq: u64,
    station: &'g StationId,
    trip: Option<&'g TripId>,
}

impl Ord for ArrivalLabel<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.arrival
            .cmp(&other.arrival)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for ArrivalLabel<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Planner<'_> {
    /// Finds the earliest arrival at the request's destination and one
    /// path achieving it.
    pub fn earliest_arrival(
        &self,
        request: &JourneyRequest,
    ) -> Result<EarliestArrival, SearchError> {
        request.validate()?;

        let transfer_time = self.config.transfer_time();
        let mut best: HashMap<&StationId, Minutes> = HashMap::new();
        let mut predecessors: HashMap<&StationId, &TripSegment> = HashMap::new();
        let mut queue = BinaryHeap::new();
        let mut seq = 0u64;
        let mut popped = 0usize;

        best.insert(&request.origin, request.start_time);
        queue.push(Reverse(ArrivalLabel {
            arrival: request.start_time,
            seq,
            station: &request.origin,
            trip: None,
        }));

        while let Some(Reverse(label)) = queue.pop() {
            popped += 1;
            if *label.station == request.destination {
                break;
            }

            // Only departures at or after the arrival are boardable.
            for segment in self.graph.connections_after(label.station, label.arrival) {
                let trip = segment.trip_id.as_ref();
                if is_transfer_needed(label.trip, trip)
                    && label.arrival + transfer_time > segment.planned_departure
                {
                    continue;
                }

                let known = best.get(&segment.to).copied().unwrap_or(Minutes::INFINITY);
                if segment.planned_arrival < known {
                    trace!(
                        from = %segment.from,
                        to = %segment.to,
                        arrival = %segment.planned_arrival,
                        "Improved arrival"
                    );
                    best.insert(&segment.to, segment.planned_arrival);
                    predecessors.insert(&segment.to, segment);
                    seq += 1;
                    queue.push(Reverse(ArrivalLabel {
                        arrival: segment.planned_arrival,
                        seq,
                        station: &segment.to,
                        trip,
                    }));
                }
            }
        }

        let arrival_time = best
            .get(&request.destination)
            .copied()
            .unwrap_or(Minutes::INFINITY);

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            arrival = %arrival_time,
            labels_popped = popped,
            "Earliest arrival search finished"
        );

        if arrival_time.is_infinite() {
            return Ok(EarliestArrival::unreachable());
        }

        let legs = reconstruct_path(&predecessors, request, arrival_time)?;
        Ok(EarliestArrival {
            arrival_time,
            path: Itinerary::new(legs)?.consolidated(),
        })
    }
}

/// Walks predecessors back from the destination to the origin.
fn reconstruct_path(
    predecessors: &HashMap<&StationId, &TripSegment>,
    request: &JourneyRequest,
    arrival_time: Minutes,
) -> Result<Vec<TripSegment>, SearchError> {
    let mut legs = Vec::new();
    let mut current = &request.destination;

    while *current != request.origin {
        // Each station has at most one predecessor, so a longer walk
        // means the chain loops.
        let segment = predecessors
            .get(current)
            .filter(|_| legs.len() < predecessors.len())
            .ok_or_else(|| SearchError::MissingPredecessor {
                station: current.clone(),
                time: arrival_time,
            })?;
        legs.push((*segment).clone());
        current = &segment.from;
    }

    legs.reverse();
    Ok(legs)
}
