//! Itinerary reliability from historical timing samples.
//!
//! The reliability of an itinerary is the probability that it reaches its
//! destination within a time budget, given the empirical departure and
//! arrival distributions of each leg and the transfer time needed between
//! different trips.

mod distribution;
mod model;

pub use distribution::TimeDistribution;
pub use model::{ReliabilityEstimate, ReliabilityModel};

use crate::domain::{Minutes, TripSegment};

/// Error from reliability evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReliabilityError {
    /// The chained computation reached an impossible state
    #[error("internal invariant violated over {legs} legs: {reason}")]
    InternalInvariantViolation { reason: &'static str, legs: usize },
}

/// Reliability of an itinerary, complete or partial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reliability {
    /// Probability the itinerary completes within the budget.
    Complete(f64),
    /// The arrival and connection components, kept apart so a search can
    /// rank a prefix that has not reached the destination yet.
    Partial(ReliabilityEstimate),
}

impl Reliability {
    /// Collapses either form into a single probability.
    pub fn value(&self) -> f64 {
        match self {
            Reliability::Complete(p) => *p,
            Reliability::Partial(estimate) => estimate.reliability(),
        }
    }
}

/// Computes the reliability of `itinerary` departing at `start_time` with
/// `time_budget` to spare.
///
/// With `complete` set the product of the components is returned;
/// otherwise both components are returned separately.
///
/// ```
/// use reliable_transit::domain::Minutes;
/// use reliable_transit::network::ic8_line;
/// use reliable_transit::reliability::{Reliability, reliability};
///
/// let path = ic8_line();
/// let r = reliability(&path, Minutes::new(400), Minutes::new(302), Minutes::new(1), true).unwrap();
/// assert!(matches!(r, Reliability::Complete(p) if (p - 0.625).abs() < 1e-9));
/// ```
pub fn reliability(
    itinerary: &[TripSegment],
    start_time: Minutes,
    time_budget: Minutes,
    transfer_time: Minutes,
    complete: bool,
) -> Result<Reliability, ReliabilityError> {
    let estimate =
        ReliabilityModel::new(transfer_time).evaluate(itinerary, start_time, time_budget)?;

    Ok(if complete {
        Reliability::Complete(estimate.reliability())
    } else {
        Reliability::Partial(estimate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ic8_line;

    #[test]
    fn partial_keeps_components() {
        let path = ic8_line();
        let r = reliability(&path, Minutes::new(400), Minutes::new(151), Minutes::new(1), false)
            .unwrap();

        let Reliability::Partial(estimate) = r else {
            panic!("expected partial result, got {r:?}");
        };
        assert!((estimate.arrival_probability - 0.2).abs() < 1e-9);
        assert!((estimate.connection_probability - 0.625).abs() < 1e-9);
        assert!((r.value() - 0.125).abs() < 1e-9);
    }

    #[test]
    fn complete_is_product() {
        let path = ic8_line();
        let partial =
            reliability(&path, Minutes::new(400), Minutes::new(151), Minutes::new(1), false)
                .unwrap();
        let complete =
            reliability(&path, Minutes::new(400), Minutes::new(151), Minutes::new(1), true)
                .unwrap();
        assert_eq!(partial.value(), complete.value());
    }

    #[test]
    fn error_display() {
        let err = ReliabilityError::InternalInvariantViolation {
            reason: "connection probability unset after chaining",
            legs: 3,
        };
        assert_eq!(
            err.to_string(),
            "internal invariant violated over 3 legs: connection probability unset after chaining"
        );
    }
}
