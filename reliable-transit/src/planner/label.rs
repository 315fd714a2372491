//! Persistent partial itineraries for the reliability search.
//!
//! Sibling branches share their common prefix: extending a path allocates
//! one node and never touches the nodes it points to.

use std::rc::Rc;

use crate::domain::{Minutes, StationId, TripSegment};

#[derive(Debug)]
struct Node {
    segment: TripSegment,
    previous: Option<Rc<Node>>,
}

/// A station reached at a scheduled time, including stops merged into a
/// longer leg.
#[derive(Debug)]
struct Stop {
    station: StationId,
    time: Minutes,
    previous: Option<Rc<Stop>>,
}

/// A partial itinerary rooted at a placeholder segment.
#[derive(Debug, Clone)]
pub struct PartialPath {
    head: Rc<Node>,
    stops: Rc<Stop>,
    /// Real legs, not counting the placeholder.
    legs: usize,
}

impl PartialPath {
    /// A path that has not left `station` yet.
    pub fn start(station: StationId, time: Minutes) -> Self {
        Self {
            stops: Rc::new(Stop {
                station: station.clone(),
                time,
                previous: None,
            }),
            head: Rc::new(Node {
                segment: TripSegment::placeholder(station, time),
                previous: None,
            }),
            legs: 0,
        }
    }

    /// The last segment (the placeholder for a fresh path).
    pub fn tail(&self) -> &TripSegment {
        &self.head.segment
    }

    /// Number of legs after the placeholder.
    pub fn legs(&self) -> usize {
        self.legs
    }

    /// A new path with `segment` appended.
    pub fn push(&self, segment: TripSegment) -> Self {
        Self {
            stops: self.stop_at(&segment),
            head: Rc::new(Node {
                segment,
                previous: Some(Rc::clone(&self.head)),
            }),
            legs: self.legs + 1,
        }
    }

    /// A new path with the tail swapped for `segment`.
    ///
    /// On a fresh path this replaces the placeholder, which callers avoid
    /// since the placeholder never consolidates.
    pub fn replace_tail(&self, segment: TripSegment) -> Self {
        Self {
            stops: self.stop_at(&segment),
            head: Rc::new(Node {
                segment,
                previous: self.head.previous.clone(),
            }),
            legs: self.legs,
        }
    }

    /// Returns true if the path has already been at `station` at `time`.
    ///
    /// Stops merged away by [`replace_tail`](Self::replace_tail) still
    /// count.
    pub fn has_visited(&self, station: &StationId, time: Minutes) -> bool {
        let mut stop = Some(&self.stops);
        while let Some(current) = stop {
            if current.station == *station && current.time == time {
                return true;
            }
            stop = current.previous.as_ref();
        }
        false
    }

    fn stop_at(&self, segment: &TripSegment) -> Rc<Stop> {
        Rc::new(Stop {
            station: segment.to.clone(),
            time: segment.planned_arrival,
            previous: Some(Rc::clone(&self.stops)),
        })
    }

    /// Copies the path out, placeholder first.
    pub fn to_vec(&self) -> Vec<TripSegment> {
        let mut segments = Vec::with_capacity(self.legs + 1);
        let mut node = Some(&self.head);
        while let Some(current) = node {
            segments.push(current.segment.clone());
            node = current.previous.as_ref();
        }
        segments.reverse();
        segments
    }
}
