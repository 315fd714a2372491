//! Most-reliable itinerary search.
//!
//! Best-first over partial itineraries: the queue always yields the prefix
//! with the highest probability of having made its last connection. Each
//! pop extends the prefix by every departure from its tail station,
//! merging same-trip continuations into the tail leg. Extensions that
//! reach the destination are scored and kept aside; they are never
//! extended further.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace, warn};

use super::label::PartialPath;
use super::search::{JourneyRequest, Planner, SearchError};
use crate::domain::{Itinerary, Minutes, TripSegment};

/// The best itinerary found.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliablePath {
    /// Scheduled arrival at the destination.
    pub arrival_time: Minutes,
    /// Probability of completing within the budget.
    pub reliability: f64,
    /// The itinerary exactly as it was scored. Same-trip legs are merged
    /// except where merging would have left no samples.
    pub itinerary: Itinerary,
}

/// Counters from one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Labels popped from the queue.
    pub expansions: usize,
    /// Labels pushed onto the queue, including the root.
    pub labels_pushed: usize,
    /// Extensions dropped for having too many legs.
    pub pruned_by_legs: usize,
    /// Extensions dropped because they could not beat the incumbent.
    pub pruned_by_incumbent: usize,
    /// Extensions dropped for returning to a stop the path already made
    /// at the same time.
    pub pruned_by_cycle: usize,
}

/// Result of the most-reliable itinerary search.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliableSearchResult {
    /// `None` when no itinerary reaches the destination.
    pub best: Option<ReliablePath>,
    pub stats: SearchStats,
    /// False if the expansion cap stopped the search with labels left.
    pub exhausted: bool,
}

impl ReliableSearchResult {
    /// Reliability of the best itinerary, zero if none was found.
    pub fn reliability(&self) -> f64 {
        self.best.as_ref().map_or(0.0, |best| best.reliability)
    }

    /// Scheduled arrival of the best itinerary.
    pub fn arrival_time(&self) -> Option<Minutes> {
        self.best.as_ref().map(|best| best.arrival_time)
    }

    /// The best itinerary.
    pub fn itinerary(&self) -> Option<&Itinerary> {
        self.best.as_ref().map(|best| &best.itinerary)
    }
}

/// Queue entry for one partial itinerary.
#[derive(Debug)]
struct Label {
    connection_probability: f64,
    seq: u64,
    /// Scheduled time from the start to the tail's arrival.
    scheduled_time: Minutes,
    arrival_probability: f64,
    path: PartialPath,
}

// Highest connection probability first, then first pushed first.
impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.connection_probability
            .total_cmp(&other.connection_probability)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

/// A complete itinerary recorded as the best so far.
struct Incumbent {
    reliability: f64,
    scheduled_time: Minutes,
    segments: Vec<TripSegment>,
}

impl Planner<'_> {
    /// Finds the itinerary most likely to reach the destination by
    /// `request.start_time + time_budget`.
    ///
    /// Finding nothing is not an error: the result's `best` is `None`.
    pub fn most_reliable_path(
        &self,
        request: &JourneyRequest,
        time_budget: Minutes,
    ) -> Result<ReliableSearchResult, SearchError> {
        request.validate()?;

        let model = self.model();
        let start = request.start_time;
        let mut stats = SearchStats::default();
        let mut best = if self.config.seed_with_earliest_arrival {
            self.earliest_incumbent(request, time_budget)?
        } else {
            None
        };

        let mut queue = BinaryHeap::new();
        let mut seq = 0u64;
        queue.push(Label {
            connection_probability: 1.0,
            seq,
            scheduled_time: Minutes::ZERO,
            arrival_probability: 1.0,
            path: PartialPath::start(request.origin.clone(), start),
        });
        stats.labels_pushed += 1;

        let mut exhausted = true;
        while let Some(label) = queue.pop() {
            if self
                .config
                .max_expansions
                .is_some_and(|cap| stats.expansions >= cap)
            {
                warn!(
                    origin = %request.origin,
                    destination = %request.destination,
                    expansions = stats.expansions,
                    remaining = queue.len() + 1,
                    "Expansion cap reached, returning best so far"
                );
                exhausted = false;
                break;
            }
            stats.expansions += 1;

            let tail = label.path.tail();
            trace!(
                station = %tail.to,
                connection = label.connection_probability,
                arrival = label.arrival_probability,
                scheduled = %label.scheduled_time,
                legs = label.path.legs(),
                "Expanding"
            );

            let departures = self.graph.connections_after(&tail.to, tail.planned_arrival);
            if departures.is_empty() {
                trace!(station = %tail.to, "Dead end");
                continue;
            }

            for candidate in departures {
                // Zero-duration loops come back to the same stop at the
                // same time and would merge into the tail forever.
                if label
                    .path
                    .has_visited(&candidate.to, candidate.planned_arrival)
                {
                    trace!(station = %candidate.to, time = %candidate.planned_arrival, "Cycle");
                    stats.pruned_by_cycle += 1;
                    continue;
                }

                let extended = extend(&label.path, candidate);
                if extended.legs() > self.config.max_legs {
                    stats.pruned_by_legs += 1;
                    continue;
                }

                let segments = extended.to_vec();
                let arrival = extended.tail().planned_arrival;
                let estimate = model.evaluate(&segments, start, time_budget).map_err(|source| {
                    SearchError::Reliability {
                        station: candidate.to.clone(),
                        time: arrival,
                        itinerary: segments.clone(),
                        source,
                    }
                })?;
                let scheduled_time = arrival - start;

                if candidate.to == request.destination {
                    let reliability = estimate.reliability();
                    if best
                        .as_ref()
                        .is_none_or(|incumbent| reliability > incumbent.reliability)
                    {
                        debug!(
                            reliability,
                            arrival = %arrival,
                            legs = extended.legs(),
                            "New best itinerary"
                        );
                        best = Some(Incumbent {
                            reliability,
                            scheduled_time,
                            segments,
                        });
                    }
                    continue;
                }

                if self.config.prune_below_incumbent
                    && best
                        .as_ref()
                        .is_some_and(|b| estimate.connection_probability <= b.reliability)
                {
                    stats.pruned_by_incumbent += 1;
                    continue;
                }

                seq += 1;
                queue.push(Label {
                    connection_probability: estimate.connection_probability,
                    seq,
                    scheduled_time,
                    arrival_probability: estimate.arrival_probability,
                    path: extended,
                });
                stats.labels_pushed += 1;
            }
        }

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            budget = %time_budget,
            expansions = stats.expansions,
            labels_pushed = stats.labels_pushed,
            pruned_by_legs = stats.pruned_by_legs,
            pruned_by_incumbent = stats.pruned_by_incumbent,
            pruned_by_cycle = stats.pruned_by_cycle,
            found = best.is_some(),
            "Reliable itinerary search finished"
        );

        let best = best
            .map(|incumbent| -> Result<_, SearchError> {
                Ok(ReliablePath {
                    arrival_time: start + incumbent.scheduled_time,
                    reliability: incumbent.reliability,
                    itinerary: Itinerary::new(incumbent.segments)?,
                })
            })
            .transpose()?;

        Ok(ReliableSearchResult {
            best,
            stats,
            exhausted,
        })
    }

    /// Scores the earliest-arrival path as a starting incumbent.
    fn earliest_incumbent(
        &self,
        request: &JourneyRequest,
        time_budget: Minutes,
    ) -> Result<Option<Incumbent>, SearchError> {
        let earliest = self.earliest_arrival(request)?;
        if !earliest.is_reachable() {
            return Ok(None);
        }

        let segments = earliest.path.into_legs();
        let reliability = self
            .model()
            .reliability(&segments, request.start_time, time_budget)
            .map_err(|source| SearchError::Reliability {
                station: request.destination.clone(),
                time: earliest.arrival_time,
                itinerary: segments.clone(),
                source,
            })?;

        debug!(reliability, arrival = %earliest.arrival_time, "Seeded incumbent");
        Ok(Some(Incumbent {
            reliability,
            scheduled_time: earliest.arrival_time - request.start_time,
            segments,
        }))
    }
}

/// Extends `path` by `segment`, merging it into the tail leg when both are
/// on the same trip and the merged leg keeps some samples.
fn extend(path: &PartialPath, segment: &TripSegment) -> PartialPath {
    let tail = path.tail();
    if !tail.needs_transfer_to(segment) {
        let joined = tail.joined_with(segment);
        if !joined.actual_times.is_empty() {
            return path.replace_tail(joined);
        }
    }
    path.push(segment.clone())
}
