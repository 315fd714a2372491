//! Time-dependent transit graph.
//!
//! Stations map to their outgoing scheduled segments, kept sorted by planned
//! departure. The graph is built once per query by an ingestion layer and is
//! read-only while searches run, so it can be shared across threads.

mod load;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ActualTime, Minutes, StationId, TripId, TripSegment};

pub use load::{LoadError, load_graph};

/// Error from graph lookups and construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The station is not a key of the graph
    #[error("unknown station: {0}")]
    UnknownStation(StationId),

    /// A segment is listed under a station it does not depart from
    #[error("segment from {found} listed under station {station}")]
    Inconsistent { station: StationId, found: StationId },
}

/// Mapping from station to its outgoing trip segments.
///
/// # Invariants
///
/// - Every station's outgoing list is sorted ascending by planned departure
/// - Every segment's `to` station is a key (possibly with an empty list)
///
/// # Examples
///
/// ```
/// use reliable_transit::domain::{ActualTime, Minutes};
/// use reliable_transit::graph::TimeDependentGraph;
///
/// let mut graph = TimeDependentGraph::new();
/// graph.add_edge("Visp", "Brig", Some("IC6"), 603, 611, vec![ActualTime::new(603, 611)]);
/// graph.add_edge("Visp", "Brig", Some("IC8"), 543, 551, vec![ActualTime::new(543, 551)]);
///
/// let out = graph.connections_from(&"Visp".into());
/// assert_eq!(out[0].planned_departure, Minutes::new(543));
/// assert!(graph.connections_from(&"Brig".into()).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<StationId, Vec<TripSegment>>",
    try_from = "BTreeMap<StationId, Vec<TripSegment>>"
)]
pub struct TimeDependentGraph {
    stations: BTreeMap<StationId, Vec<TripSegment>>,
}

impl TimeDependentGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `station` exists, with an empty outgoing list if new.
    pub fn add_node(&mut self, station: impl Into<StationId>) {
        self.stations.entry(station.into()).or_default();
    }

    /// Adds a scheduled segment, creating both endpoints as needed.
    pub fn add_edge(
        &mut self,
        from: impl Into<StationId>,
        to: impl Into<StationId>,
        trip_id: Option<&str>,
        planned_departure: impl Into<Minutes>,
        planned_arrival: impl Into<Minutes>,
        actual_times: Vec<ActualTime>,
    ) {
        let segment = TripSegment::new(
            from.into(),
            to.into(),
            trip_id.map(TripId::from),
            planned_departure.into(),
            planned_arrival.into(),
            actual_times,
        );
        self.insert_segment(segment);
    }

    /// Adds an already-built segment, creating both endpoints as needed.
    ///
    /// The segment goes after any existing segment with the same planned
    /// departure, so insertion order breaks ties.
    pub fn insert_segment(&mut self, segment: TripSegment) {
        self.add_node(segment.to.clone());
        let outgoing = self.stations.entry(segment.from.clone()).or_default();
        let at = outgoing.partition_point(|s| s.planned_departure <= segment.planned_departure);
        outgoing.insert(at, segment);
    }

    /// Re-sorts every outgoing list by planned departure.
    ///
    /// The sort is stable, so segments departing together keep their
    /// relative order.
    pub fn sort_connections(&mut self) {
        for outgoing in self.stations.values_mut() {
            outgoing.sort_by_key(|s| s.planned_departure);
        }
    }

    /// Returns the outgoing segments of `station`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownStation`] if the station is not a key.
    pub fn outgoing(&self, station: &StationId) -> Result<&[TripSegment], GraphError> {
        self.stations
            .get(station)
            .map(Vec::as_slice)
            .ok_or_else(|| GraphError::UnknownStation(station.clone()))
    }

    /// Returns the outgoing segments of `station`, or an empty slice if the
    /// station is unknown. Searches treat both cases as a dead end.
    pub fn connections_from(&self, station: &StationId) -> &[TripSegment] {
        self.stations.get(station).map_or(&[], Vec::as_slice)
    }

    /// Returns the outgoing segments of `station` departing at or after
    /// `time`.
    pub fn connections_after(&self, station: &StationId, time: Minutes) -> &[TripSegment] {
        let outgoing = self.connections_from(station);
        let start = outgoing.partition_point(|s| s.planned_departure < time);
        &outgoing[start..]
    }

    /// Returns true if `station` is a key of the graph.
    pub fn contains(&self, station: &StationId) -> bool {
        self.stations.contains_key(station)
    }

    /// Iterates the stations in key order.
    pub fn stations(&self) -> impl Iterator<Item = &StationId> {
        self.stations.keys()
    }

    /// Number of stations.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Number of scheduled segments.
    pub fn segment_count(&self) -> usize {
        self.stations.values().map(Vec::len).sum()
    }

    /// Returns true if the graph has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl TryFrom<BTreeMap<StationId, Vec<TripSegment>>> for TimeDependentGraph {
    type Error = GraphError;

    fn try_from(stations: BTreeMap<StationId, Vec<TripSegment>>) -> Result<Self, Self::Error> {
        let mut graph = TimeDependentGraph::new();
        for (station, outgoing) in stations {
            graph.add_node(station.clone());
            for segment in outgoing {
                if segment.from != station {
                    return Err(GraphError::Inconsistent {
                        station,
                        found: segment.from,
                    });
                }
                graph.insert_segment(segment);
            }
        }
        Ok(graph)
    }
}

impl From<TimeDependentGraph> for BTreeMap<StationId, Vec<TripSegment>> {
    fn from(graph: TimeDependentGraph) -> Self {
        graph.stations
    }
}
