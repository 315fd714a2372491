//! Timetable time handling.
//!
//! All schedule and observation times are integer minutes since a reference
//! epoch (normally midnight of the service day). Services running past
//! midnight simply carry values of 1440 and above.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Minutes in one service day.
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A point in time (or a span) measured in whole minutes.
///
/// # Examples
///
/// ```
/// use reliable_transit::domain::Minutes;
///
/// let dep = Minutes::parse_hhmm("08:07").unwrap();
/// assert_eq!(dep, Minutes::new(487));
/// assert_eq!(dep.to_string(), "08:07");
///
/// // Past midnight the day offset is shown
/// assert_eq!(Minutes::new(1445).to_string(), "00:05+1d");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Minutes(i64);

impl Minutes {
    /// Sentinel for "never reached".
    pub const INFINITY: Minutes = Minutes(i64::MAX);

    /// Zero minutes.
    pub const ZERO: Minutes = Minutes(0);

    /// Create a time from a raw minute count.
    pub const fn new(minutes: i64) -> Self {
        Self(minutes)
    }

    /// Returns the raw minute count.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true for the [`Minutes::INFINITY`] sentinel.
    pub fn is_infinite(self) -> bool {
        self == Self::INFINITY
    }

    /// Parse a minute-of-day from "HH:MM" format.
    ///
    /// ```
    /// use reliable_transit::domain::Minutes;
    ///
    /// assert!(Minutes::parse_hhmm("00:00").is_ok());
    /// assert!(Minutes::parse_hhmm("23:59").is_ok());
    /// assert!(Minutes::parse_hhmm("0640").is_err());
    /// assert!(Minutes::parse_hhmm("25:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }
        let time = NaiveTime::parse_from_str(s, "%H:%M")
            .map_err(|_| TimeError::new("expected valid HH:MM time"))?;

        Ok(Self::from_time_of_day(time))
    }

    /// Convert a wall-clock time to minutes after midnight.
    pub fn from_time_of_day(time: NaiveTime) -> Self {
        Self(i64::from(time.hour()) * 60 + i64::from(time.minute()))
    }

    /// Multiply a span by a factor, truncating toward zero.
    ///
    /// Used to scale a travel time into a time budget.
    pub fn scale(self, factor: f64) -> Self {
        Self((self.0 as f64 * factor) as i64)
    }
}

impl Add for Minutes {
    type Output = Minutes;

    /// Saturates so that adding to [`Minutes::INFINITY`] stays infinite.
    fn add(self, rhs: Minutes) -> Minutes {
        Minutes(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Minutes {
    type Output = Minutes;

    fn sub(self, rhs: Minutes) -> Minutes {
        Minutes(self.0.saturating_sub(rhs.0))
    }
}

impl From<i64> for Minutes {
    fn from(minutes: i64) -> Self {
        Self(minutes)
    }
}

impl fmt::Debug for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            f.write_str("Minutes(inf)")
        } else {
            write!(f, "Minutes({})", self.0)
        }
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            return f.write_str("never");
        }

        let days = self.0.div_euclid(MINUTES_PER_DAY);
        let of_day = self.0.rem_euclid(MINUTES_PER_DAY);
        let time = NaiveTime::from_hms_opt((of_day / 60) as u32, (of_day % 60) as u32, 0)
            .ok_or(fmt::Error)?;

        write!(f, "{}", time.format("%H:%M"))?;
        if days != 0 {
            write!(f, "{days:+}d")?;
        }
        Ok(())
    }
}
