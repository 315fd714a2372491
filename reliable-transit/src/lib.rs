//! Reliability-aware transit journey planner.
//!
//! Answers two questions over a time-dependent network annotated with
//! historical timings: "when is the earliest I can get there?" and "which
//! itinerary is most likely to get me there within my time budget?"

pub mod domain;
pub mod graph;
pub mod network;
pub mod planner;
pub mod reliability;
