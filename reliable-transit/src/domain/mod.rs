//! Domain types for the reliability planner.
//!
//! This module contains the core model: stations, trips, times, scheduled
//! segments with their historical observations, and itineraries. Types
//! enforce their invariants at construction time where they have any.

mod error;
mod itinerary;
mod segment;
mod station;
mod time;
mod trip;

pub use error::DomainError;
pub use itinerary::{Itinerary, consolidate_path};
pub use segment::{ActualTime, TripSegment, merge_actual_times};
pub use station::StationId;
pub use time::{Minutes, TimeError};
pub use trip::{TripId, is_transfer_needed};
