//! Empirical time distributions.

use std::collections::BTreeMap;

use crate::domain::Minutes;

/// A discrete probability distribution over minutes.
///
/// Masses are kept sorted by time with one entry per distinct time, so
/// duplicated observations never count twice.
///
/// # Examples
///
/// ```
/// use reliable_transit::domain::Minutes;
/// use reliable_transit::reliability::TimeDistribution;
///
/// let arrivals = [505, 508, 508, 511].map(Minutes::new);
/// let dist = TimeDistribution::from_samples(arrivals);
///
/// assert_eq!(dist.len(), 3);
/// assert_eq!(dist.probability_at(Minutes::new(508)), 0.5);
/// assert_eq!(dist.probability_at_or_before(Minutes::new(508)), 0.75);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeDistribution {
    masses: Vec<(Minutes, f64)>,
}

impl TimeDistribution {
    /// Builds the empirical distribution of `samples`: each distinct time
    /// gets `count / total`. No samples gives an empty distribution.
    pub fn from_samples(samples: impl IntoIterator<Item = Minutes>) -> Self {
        let mut counts: BTreeMap<Minutes, usize> = BTreeMap::new();
        let mut total = 0usize;
        for time in samples {
            *counts.entry(time).or_default() += 1;
            total += 1;
        }

        let masses = counts
            .into_iter()
            .map(|(time, count)| (time, count as f64 / total as f64))
            .collect();
        Self { masses }
    }

    /// Builds a distribution from precomputed `(time, probability)` pairs.
    ///
    /// Repeated pairs collapse into one entry; for a repeated time the
    /// last probability wins.
    pub fn from_masses(masses: impl IntoIterator<Item = (Minutes, f64)>) -> Self {
        let unique: BTreeMap<Minutes, f64> = masses.into_iter().collect();
        Self {
            masses: unique.into_iter().collect(),
        }
    }

    /// Probability mass exactly at `time`.
    pub fn probability_at(&self, time: Minutes) -> f64 {
        self.masses
            .binary_search_by_key(&time, |(t, _)| *t)
            .map_or(0.0, |i| self.masses[i].1)
    }

    /// Sum of the mass at times at or before `limit`.
    pub fn probability_at_or_before(&self, limit: Minutes) -> f64 {
        self.masses
            .iter()
            .take_while(|(t, _)| *t <= limit)
            .map(|(_, p)| p)
            .sum()
    }

    /// Sum of all mass. One for an empirical distribution, zero if empty.
    pub fn total_mass(&self) -> f64 {
        self.masses.iter().map(|(_, p)| p).sum()
    }

    /// Iterates `(time, probability)` in time order.
    pub fn iter(&self) -> impl Iterator<Item = (Minutes, f64)> + '_ {
        self.masses.iter().copied()
    }

    /// Number of distinct times.
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Returns true when there are no times.
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Earliest time with an entry.
    pub fn earliest(&self) -> Option<Minutes> {
        self.masses.first().map(|(t, _)| *t)
    }

    /// Latest time with an entry.
    pub fn latest(&self) -> Option<Minutes> {
        self.masses.last().map(|(t, _)| *t)
    }
}
