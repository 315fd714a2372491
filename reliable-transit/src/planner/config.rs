//! Search configuration for the planner.

use crate::domain::Minutes;

/// Configuration parameters for both searches.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Minimum time needed to change between different trips (minutes).
    pub transfer_time_mins: i64,

    /// Factor applied to the earliest-arrival travel time to get the
    /// budget for the reliability search.
    pub time_budget_multiplier: f64,

    /// Maximum number of legs (after consolidation) in a candidate
    /// itinerary. Longer branches are pruned.
    pub max_legs: usize,

    /// Start the reliability search with the earliest-arrival path as the
    /// incumbent best candidate.
    pub seed_with_earliest_arrival: bool,

    /// Drop partial itineraries whose connection probability is already no
    /// better than the incumbent's reliability.
    ///
    /// This is a heuristic: the final reliability only uses the last
    /// connection probability, so a pruned branch could in principle have
    /// won.
    pub prune_below_incumbent: bool,

    /// Stop the reliability search after this many queue pops and return
    /// the best candidate so far.
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    /// Create a new configuration with the given core parameters and no
    /// optional pruning.
    pub fn new(transfer_time_mins: i64, time_budget_multiplier: f64, max_legs: usize) -> Self {
        Self {
            transfer_time_mins,
            time_budget_multiplier,
            max_legs,
            ..Self::default()
        }
    }

    /// Returns the transfer time.
    pub fn transfer_time(&self) -> Minutes {
        Minutes::new(self.transfer_time_mins)
    }

    /// Budget for the reliability search given the earliest arrival.
    ///
    /// The earliest travel time scaled by the multiplier, truncated to
    /// whole minutes.
    pub fn time_budget(&self, start_time: Minutes, earliest_arrival: Minutes) -> Minutes {
        (earliest_arrival - start_time).scale(self.time_budget_multiplier)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            transfer_time_mins: 5,
            time_budget_multiplier: 1.5,
            max_legs: 4,
            seed_with_earliest_arrival: false,
            prune_below_incumbent: false,
            max_expansions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.transfer_time_mins, 5);
        assert_eq!(config.time_budget_multiplier, 1.5);
        assert_eq!(config.max_legs, 4);
        assert!(!config.seed_with_earliest_arrival);
        assert!(!config.prune_below_incumbent);
        assert_eq!(config.max_expansions, None);
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::new(1, 2.0, 3);

        assert_eq!(config.transfer_time(), Minutes::new(1));
        assert_eq!(config.time_budget_multiplier, 2.0);
        assert_eq!(config.max_legs, 3);
        assert_eq!(config.max_expansions, None);
    }

    #[test]
    fn time_budget_from_earliest_arrival() {
        let config = SearchConfig::default();
        let budget = config.time_budget(Minutes::new(400), Minutes::new(551));
        assert_eq!(budget, Minutes::new(226));

        let exact = SearchConfig::new(5, 1.0, 4);
        assert_eq!(exact.time_budget(Minutes::new(400), Minutes::new(551)), Minutes::new(151));
    }
}
