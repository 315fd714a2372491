//! Loading graphs produced by the ingestion layer.
//!
//! The exchange format is JSON: an object from station key to the list of
//! that station's outgoing segments.
//!
//! ```json
//! {
//!   "Bern": [
//!     {"from": "Bern", "to": "Thun", "planned_departure": 487,
//!      "planned_arrival": 505, "trip_id": "IC8",
//!      "actual_times": [[487, 505], [490, 508]]}
//!   ],
//!   "Thun": []
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use super::TimeDependentGraph;

/// Error loading a graph.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("failed to read graph file: {0}")]
    Io(#[from] std::io::Error),

    /// The contents are not a valid graph
    #[error("invalid graph data: {0}")]
    Json(#[from] serde_json::Error),
}

impl TimeDependentGraph {
    /// Parse a graph from JSON.
    ///
    /// Outgoing lists are sorted and missing destination stations are
    /// added, whatever order the input uses.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse a graph from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Load a graph from a JSON file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<TimeDependentGraph, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let graph = TimeDependentGraph::from_json_reader(BufReader::new(file))?;

    debug!(
        path = %path.display(),
        stations = graph.station_count(),
        segments = graph.segment_count(),
        "Loaded graph"
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Minutes, StationId};
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "Visp": [
            {"from": "Visp", "to": "Brig", "planned_departure": 603, "planned_arrival": 611,
             "trip_id": "IC6", "actual_times": [[603, 611], [606, 614]]},
            {"from": "Visp", "to": "Brig", "planned_departure": 543, "planned_arrival": 551,
             "trip_id": "IC8", "actual_times": [[543, 551], [546, 554]]}
        ]
    }"#;

    #[test]
    fn parses_and_sorts() {
        let graph = TimeDependentGraph::from_json_str(SAMPLE).unwrap();
        let out = graph.connections_from(&StationId::from("Visp"));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].planned_departure, Minutes::new(543));
        assert_eq!(out[1].planned_departure, Minutes::new(603));
    }

    #[test]
    fn adds_missing_destinations() {
        let graph = TimeDependentGraph::from_json_str(SAMPLE).unwrap();
        assert!(graph.contains(&StationId::from("Brig")));
        assert_eq!(graph.station_count(), 2);
    }

    #[test]
    fn round_trips_through_json() {
        let graph = TimeDependentGraph::from_json_str(SAMPLE).unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(TimeDependentGraph::from_json_str(&json).unwrap(), graph);
    }

    #[test]
    fn rejects_misfiled_segment() {
        let json = r#"{"Bern": [{"from": "Thun", "to": "Spiez",
            "planned_departure": 1, "planned_arrival": 2}]}"#;
        let err = TimeDependentGraph::from_json_str(json).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
        assert!(err.to_string().contains("listed under station Bern"));
    }

    #[test]
    fn accepts_numeric_station_ids() {
        let json = r#"{"8507000": [{"from": 8507000, "to": 8504100,
            "planned_departure": 1, "planned_arrival": 2}]}"#;
        let graph = TimeDependentGraph::from_json_str(json).unwrap();

        let out = graph.connections_from(&StationId::from(8507000_u64));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, StationId::from("8504100"));
        assert!(graph.contains(&StationId::from(8504100_u64)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = TimeDependentGraph::from_json_str("{\"Bern\": 3}").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let graph = load_graph(file.path()).unwrap();
        assert_eq!(graph.segment_count(), 2);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_graph(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
