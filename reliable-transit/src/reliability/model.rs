//! Chained connection and arrival probabilities along an itinerary.
//!
//! Walking the itinerary leg by leg, each step takes the arrival-time
//! distribution at the previous leg's tail and the current leg's observed
//! departures to compute
//!
//! - the probability the connection is made:
//!   `P(made) = Σ_t P(dep = t) · P(prev arrives ≤ deadline(t))`
//! - the arrival-time distribution of the current leg given the connection
//!   was made, normalised by `P(made)`.
//!
//! `deadline(t)` is `t - transfer_time` when the two legs belong to
//! different trips and `t` otherwise.

use std::collections::HashMap;

use tracing::trace;

use super::{ReliabilityError, TimeDistribution};
use crate::domain::{Minutes, TripSegment};

/// Result of evaluating an itinerary prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReliabilityEstimate {
    /// Probability the tail leg arrives by the deadline, given every
    /// connection was made.
    pub arrival_probability: f64,
    /// Probability the last connection of the prefix is made. One for a
    /// single-leg prefix.
    pub connection_probability: f64,
}

impl ReliabilityEstimate {
    /// Estimate for an itinerary that cannot be evaluated.
    pub const ZERO: Self = Self {
        arrival_probability: 0.0,
        connection_probability: 0.0,
    };

    fn new(arrival_probability: f64, connection_probability: f64) -> Self {
        // Float noise can push an exact 1.0 just past the bound.
        Self {
            arrival_probability: arrival_probability.clamp(0.0, 1.0),
            connection_probability: connection_probability.clamp(0.0, 1.0),
        }
    }

    /// Probability the whole itinerary completes within the budget.
    pub fn reliability(&self) -> f64 {
        self.arrival_probability * self.connection_probability
    }
}

/// Evaluates itineraries against their segments' historical samples.
///
/// # Examples
///
/// ```
/// use reliable_transit::domain::{ActualTime, Minutes, TripSegment};
/// use reliable_transit::reliability::ReliabilityModel;
///
/// let leg = TripSegment::new(
///     "Bern".into(), "Thun".into(), Some("IC8".into()),
///     Minutes::new(487), Minutes::new(505),
///     vec![ActualTime::new(487, 505), ActualTime::new(490, 508)],
/// );
/// let model = ReliabilityModel::new(Minutes::new(5));
///
/// // Only the on-time sample arrives by 08:25
/// let r = model.reliability(&[leg], Minutes::new(400), Minutes::new(105)).unwrap();
/// assert_eq!(r, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReliabilityModel {
    transfer_time: Minutes,
}

impl ReliabilityModel {
    /// Create a model with the given minimum transfer time.
    pub fn new(transfer_time: Minutes) -> Self {
        Self { transfer_time }
    }

    /// Returns the minimum transfer time.
    pub fn transfer_time(&self) -> Minutes {
        self.transfer_time
    }

    /// Evaluates a prefix without multiplying the two components.
    ///
    /// A leading placeholder segment is skipped. An empty prefix gives
    /// [`ReliabilityEstimate::ZERO`].
    pub fn evaluate(
        &self,
        segments: &[TripSegment],
        start_time: Minutes,
        time_budget: Minutes,
    ) -> Result<ReliabilityEstimate, ReliabilityError> {
        let segments = match segments.split_first() {
            Some((first, rest)) if first.is_placeholder() => rest,
            _ => segments,
        };
        let deadline = start_time + time_budget;

        let Some((first, rest)) = segments.split_first() else {
            return Ok(ReliabilityEstimate::ZERO);
        };

        let mut arrivals = TimeDistribution::from_samples(first.actual_arrivals());
        if rest.is_empty() {
            return Ok(ReliabilityEstimate::new(
                arrivals.probability_at_or_before(deadline),
                1.0,
            ));
        }

        let mut previous = first;
        let mut last_connection = None;
        for current in rest {
            let step = self.connect(previous, &arrivals, current);
            trace!(
                from = %current.from,
                to = %current.to,
                connection = step.connection_probability,
                "Chained connection"
            );

            arrivals = step.arrivals;
            last_connection = Some(step.connection_probability);
            previous = current;
        }

        let connection_probability =
            last_connection.ok_or(ReliabilityError::InternalInvariantViolation {
                reason: "connection probability unset after chaining",
                legs: segments.len(),
            })?;

        Ok(ReliabilityEstimate::new(
            arrivals.probability_at_or_before(deadline),
            connection_probability,
        ))
    }

    /// Probability the itinerary completes by `start_time + time_budget`.
    pub fn reliability(
        &self,
        segments: &[TripSegment],
        start_time: Minutes,
        time_budget: Minutes,
    ) -> Result<f64, ReliabilityError> {
        self.evaluate(segments, start_time, time_budget)
            .map(|estimate| estimate.reliability())
    }

    fn connect(
        &self,
        previous: &TripSegment,
        previous_arrivals: &TimeDistribution,
        current: &TripSegment,
    ) -> ChainStep {
        let boarding = Boarding {
            transfer_time: previous
                .needs_transfer_to(current)
                .then_some(self.transfer_time),
        };
        let departures = TimeDistribution::from_samples(current.actual_departures());

        let connection_probability =
            connection_probability(&departures, previous_arrivals, boarding);
        let arrivals = arrivals_given_connection(
            current,
            &departures,
            previous_arrivals,
            connection_probability,
            boarding,
        );

        ChainStep {
            connection_probability,
            arrivals,
        }
    }
}

/// Outcome of connecting one leg to the next.
struct ChainStep {
    connection_probability: f64,
    arrivals: TimeDistribution,
}

/// When a rider must be at the station to board a departure.
#[derive(Clone, Copy)]
struct Boarding {
    /// `None` when staying on the same trip.
    transfer_time: Option<Minutes>,
}

impl Boarding {
    fn latest_arrival(self, departure: Minutes) -> Minutes {
        match self.transfer_time {
            Some(transfer) => departure - transfer,
            None => departure,
        }
    }
}

fn connection_probability(
    departures: &TimeDistribution,
    previous_arrivals: &TimeDistribution,
    boarding: Boarding,
) -> f64 {
    departures
        .iter()
        .map(|(t, p_dep)| {
            p_dep * previous_arrivals.probability_at_or_before(boarding.latest_arrival(t))
        })
        .sum()
}

/// `P(arrive = a | connection made)` for every observed arrival `a` of
/// `current`.
///
/// For each departure `t`, the joint `P(dep = t, arr = a)` is the share of
/// samples with exactly that pair. When the connection can never be made
/// every arrival gets zero mass.
fn arrivals_given_connection(
    current: &TripSegment,
    departures: &TimeDistribution,
    previous_arrivals: &TimeDistribution,
    connection_probability: f64,
    boarding: Boarding,
) -> TimeDistribution {
    if connection_probability == 0.0 {
        return TimeDistribution::from_masses(current.actual_arrivals().map(|a| (a, 0.0)));
    }

    let total = current.actual_times.len() as f64;
    let mut pair_counts: HashMap<(Minutes, Minutes), usize> = HashMap::new();
    for sample in &current.actual_times {
        *pair_counts
            .entry((sample.departure, sample.arrival))
            .or_default() += 1;
    }

    let masses = current.actual_arrivals().map(|arrival| {
        let probability = departures
            .iter()
            .map(|(t, p_dep)| {
                let joint = pair_counts.get(&(t, arrival)).copied().unwrap_or(0) as f64 / total;
                let arrival_given_departure = joint / p_dep;
                let previous_in_time =
                    previous_arrivals.probability_at_or_before(boarding.latest_arrival(t));

                (p_dep * previous_in_time * arrival_given_departure) / connection_probability
            })
            .sum();
        (arrival, probability)
    });

    TimeDistribution::from_masses(masses)
}
