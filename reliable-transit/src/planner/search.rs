//! Planner entry points.
//!
//! A query runs the earliest-arrival search, uses its travel time to derive
//! a budget, and then looks for the most reliable itinerary within that
//! budget. Each query owns all of its search state; the graph is only read.

use std::time::Instant;

use tracing::{debug, info};

use super::config::SearchConfig;
use super::earliest::EarliestArrival;
use super::reliable::ReliableSearchResult;
use crate::domain::{DomainError, Minutes, StationId, TripSegment};
use crate::graph::TimeDependentGraph;
use crate::reliability::{ReliabilityError, ReliabilityModel};

/// Error from journey search.
///
/// Dead ends (no path, no reliable path, a station without departures) are
/// not errors; they are reported in the results. These variants mean the
/// query had to be aborted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Path reconstruction reached a station with no recorded predecessor
    #[error("no predecessor recorded for {station} (best arrival {time})")]
    MissingPredecessor { station: StationId, time: Minutes },

    /// Reliability evaluation failed for a partial itinerary
    #[error("reliability evaluation failed at {station} ({time}) after {} segments: {source}", itinerary.len())]
    Reliability {
        station: StationId,
        time: Minutes,
        itinerary: Vec<TripSegment>,
        source: ReliabilityError,
    },

    /// A result itinerary failed validation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Request for a journey search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyRequest {
    /// Where the traveller starts.
    pub origin: StationId,

    /// Where the traveller wants to go.
    pub destination: StationId,

    /// Earliest time the traveller can leave.
    pub start_time: Minutes,
}

impl JourneyRequest {
    /// Create a new search request.
    pub fn new(
        origin: impl Into<StationId>,
        destination: impl Into<StationId>,
        start_time: impl Into<Minutes>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            start_time: start_time.into(),
        }
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.origin == self.destination {
            return Err(SearchError::InvalidRequest(
                "origin and destination are the same station".to_string(),
            ));
        }

        if self.start_time.is_infinite() {
            return Err(SearchError::InvalidRequest(
                "start time must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

/// Everything one query produces.
#[derive(Debug, Clone)]
pub struct JourneyPlan {
    /// The earliest-arrival result.
    pub earliest: EarliestArrival,

    /// Reliability of the earliest path with no slack beyond its own
    /// travel time. Zero when unreachable.
    pub earliest_reliability: f64,

    /// Budget used for the reliability search. `None` when unreachable.
    pub time_budget: Option<Minutes>,

    /// The reliability search result. `None` when unreachable.
    pub reliable: Option<ReliableSearchResult>,
}

/// Journey planner over a time-dependent graph.
pub struct Planner<'a> {
    pub(super) graph: &'a TimeDependentGraph,
    pub(super) config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(graph: &'a TimeDependentGraph, config: &'a SearchConfig) -> Self {
        Self { graph, config }
    }

    /// Returns the reliability model for this planner's transfer time.
    pub fn model(&self) -> ReliabilityModel {
        ReliabilityModel::new(self.config.transfer_time())
    }

    /// Run the full query: earliest arrival, its reliability, and the most
    /// reliable itinerary within the derived budget.
    pub fn plan(&self, request: &JourneyRequest) -> Result<JourneyPlan, SearchError> {
        request.validate()?;

        let started = Instant::now();
        let earliest = self.earliest_arrival(request)?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            arrival = %earliest.arrival_time,
            "Earliest arrival search complete"
        );

        if !earliest.is_reachable() {
            info!(
                origin = %request.origin,
                destination = %request.destination,
                "Destination unreachable"
            );
            return Ok(JourneyPlan {
                earliest,
                earliest_reliability: 0.0,
                time_budget: None,
                reliable: None,
            });
        }

        let exact_budget = earliest.arrival_time - request.start_time;
        let earliest_reliability = self
            .model()
            .reliability(earliest.path.legs(), request.start_time, exact_budget)
            .map_err(|source| SearchError::Reliability {
                station: request.destination.clone(),
                time: earliest.arrival_time,
                itinerary: earliest.path.legs().to_vec(),
                source,
            })?;

        let time_budget = self
            .config
            .time_budget(request.start_time, earliest.arrival_time);

        let started = Instant::now();
        let reliable = self.most_reliable_path(request, time_budget)?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            expansions = reliable.stats.expansions,
            "Reliable itinerary search complete"
        );

        Ok(JourneyPlan {
            earliest,
            earliest_reliability,
            time_budget: Some(time_budget),
            reliable: Some(reliable),
        })
    }
}

/// Run [`Planner::plan`] once.
pub fn plan_journey(
    graph: &TimeDependentGraph,
    request: &JourneyRequest,
    config: &SearchConfig,
) -> Result<JourneyPlan, SearchError> {
    Planner::new(graph, config).plan(request)
}

/// Earliest arrival from `source` to `destination` leaving at `start_time`.
///
/// Unreachable destinations give [`Minutes::INFINITY`] and an empty path.
pub fn earliest_arrival(
    graph: &TimeDependentGraph,
    source: impl Into<StationId>,
    destination: impl Into<StationId>,
    start_time: Minutes,
    transfer_time: Minutes,
) -> Result<EarliestArrival, SearchError> {
    let config = SearchConfig {
        transfer_time_mins: transfer_time.get(),
        ..SearchConfig::default()
    };
    let request = JourneyRequest::new(source, destination, start_time);
    Planner::new(graph, &config).earliest_arrival(&request)
}

/// Most reliable itinerary from `source` to `destination` leaving at
/// `start_time` and arriving within `time_budget`, with the default leg
/// limit.
pub fn most_reliable_path(
    graph: &TimeDependentGraph,
    source: impl Into<StationId>,
    destination: impl Into<StationId>,
    start_time: Minutes,
    time_budget: Minutes,
    transfer_time: Minutes,
) -> Result<ReliableSearchResult, SearchError> {
    let config = SearchConfig {
        transfer_time_mins: transfer_time.get(),
        ..SearchConfig::default()
    };
    let request = JourneyRequest::new(source, destination, start_time);
    Planner::new(graph, &config).most_reliable_path(&request, time_budget)
}
