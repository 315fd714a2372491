//! Built-in reference networks.
//!
//! Small hand-made timetables with historical samples, used by the demo
//! binary and the tests. They mirror the Swiss IC6/IC8 corridor between
//! Zürich, Basel and the Valais.

use crate::domain::{ActualTime, Minutes, TripSegment};
use crate::graph::TimeDependentGraph;

/// Builder for small graphs given as `(departure, arrival)` samples.
///
/// The first sample is taken as the planned schedule.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    inner: TimeDependentGraph,
}

impl NetworkBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a station with no outgoing segments yet.
    pub fn station(mut self, station: &str) -> Self {
        self.inner.add_node(station);
        self
    }

    /// Add a segment. Segments without samples are skipped, since there is
    /// nothing to take the schedule from.
    pub fn segment(mut self, from: &str, to: &str, trip: &str, samples: &[(i64, i64)]) -> Self {
        if let Some(&(departure, arrival)) = samples.first() {
            self.inner.add_edge(
                from,
                to,
                Some(trip),
                departure,
                arrival,
                samples.iter().map(|&(d, a)| ActualTime::new(d, a)).collect(),
            );
        }
        self
    }

    /// Build the graph.
    pub fn build(mut self) -> TimeDependentGraph {
        self.inner.sort_connections();
        self.inner
    }
}

/// The Swiss reference network.
///
/// Two trips run the Bern - Thun - Spiez - Visp - Brig corridor: IC8 in the
/// morning and IC6 an hour later. IC8 is fed from Zürich HB via Aarau and
/// Olten, IC6 from Liestal via Olten. Every segment has two samples: on
/// time and three minutes late. Brig has no outgoing segments.
pub fn swiss_reference_network() -> TimeDependentGraph {
    NetworkBuilder::new()
        .segment("Liestal", "Olten", "IC6", &[(487, 505), (490, 508)])
        .segment("Olten", "Bern", "IC6", &[(509, 536), (512, 539)])
        .segment("Olten", "Bern", "IC8", &[(451, 478), (454, 481)])
        .segment("Bern", "Thun", "IC6", &[(547, 565), (550, 568)])
        .segment("Bern", "Thun", "IC8", &[(487, 505), (490, 508)])
        .segment("Thun", "Spiez", "IC6", &[(566, 576), (569, 579)])
        .segment("Thun", "Spiez", "IC8", &[(506, 516), (509, 519)])
        .segment("Spiez", "Visp", "IC6", &[(576, 602), (579, 605)])
        .segment("Spiez", "Visp", "IC8", &[(516, 542), (519, 545)])
        .segment("Visp", "Brig", "IC6", &[(603, 611), (606, 614)])
        .segment("Visp", "Brig", "IC8", &[(543, 551), (546, 554)])
        .station("Brig")
        .segment("Aarau", "Olten", "IC8", &[(438, 447), (441, 450)])
        .segment("Zürich HB", "Aarau", "IC8", &[(404, 436), (407, 439)])
        .build()
}

/// The IC8 run from Bern to Brig as four unconsolidated segments.
pub fn ic8_line() -> Vec<TripSegment> {
    let graph = swiss_reference_network();
    let mut legs = Vec::new();
    for (from, to) in [
        ("Bern", "Thun"),
        ("Thun", "Spiez"),
        ("Spiez", "Visp"),
        ("Visp", "Brig"),
    ] {
        legs.extend(
            graph
                .connections_from(&from.into())
                .iter()
                .find(|s| s.to.as_str() == to && s.trip_id.as_ref().is_some_and(|t| t.as_str() == "IC8"))
                .cloned(),
        );
    }
    legs
}

/// Default departure time for queries on the reference network (06:40).
pub const REFERENCE_START: Minutes = Minutes::new(400);
