//! Journey planner over a time-dependent graph.
//!
//! Two searches share one request type and one result shape:
//!
//! - earliest arrival: a time-dependent Dijkstra that honours transfer
//!   times between different trips and merges same-trip legs;
//! - most reliable itinerary: a best-first search over partial
//!   itineraries ranked by the probability of having made every
//!   connection so far, scored with the empirical reliability model.
//!
//! [`Planner::plan`] runs both, deriving the reliability budget from the
//! earliest arrival.

mod config;
mod earliest;
mod label;
mod reliable;
mod search;

#[cfg(test)]
mod search_tests;

pub use config::SearchConfig;
pub use earliest::EarliestArrival;
pub use reliable::{ReliablePath, ReliableSearchResult, SearchStats};
pub use search::{
    JourneyPlan, JourneyRequest, Planner, SearchError, earliest_arrival, most_reliable_path,
    plan_journey,
};
