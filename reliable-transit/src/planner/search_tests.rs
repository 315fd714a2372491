//! Scenario tests for both searches on the Swiss reference network.

use super::*;
use crate::domain::{ActualTime, Minutes, StationId};
use crate::graph::TimeDependentGraph;
use crate::network::{REFERENCE_START, swiss_reference_network};

fn request(from: &str, to: &str) -> JourneyRequest {
    JourneyRequest::new(from, to, REFERENCE_START)
}

fn trip_of(plan: &crate::domain::Itinerary, index: usize) -> &str {
    plan.legs()[index]
        .trip_id
        .as_ref()
        .map_or("", |trip| trip.as_str())
}

/// The reference network plus a branch line from Spiez that goes nowhere.
fn network_with_branch() -> TimeDependentGraph {
    let mut graph = swiss_reference_network();
    graph.add_edge(
        "Spiez",
        "Interlaken",
        Some("S1"),
        525,
        545,
        vec![ActualTime::new(525, 545), ActualTime::new(528, 548)],
    );
    graph
}

#[test]
fn earliest_arrival_bern_to_brig() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let result = planner.earliest_arrival(&request("Bern", "Brig")).unwrap();

    assert_eq!(result.arrival_time, Minutes::new(551));
    assert_eq!(result.path.len(), 1);
    assert_eq!(trip_of(&result.path, 0), "IC8");
    assert_eq!(result.path.departure_time(), Some(Minutes::new(487)));
    assert_eq!(
        result.path.to_string(),
        "Take IC8 from Bern to Brig at 08:07 and arrive at 09:11"
    );
}

#[test]
fn earliest_arrival_follows_one_trip_from_zurich() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let result = planner.earliest_arrival(&request("Zürich HB", "Brig")).unwrap();

    assert_eq!(result.arrival_time, Minutes::new(551));
    assert_eq!(result.path.len(), 1);
    assert_eq!(result.path.origin(), Some(&StationId::from("Zürich HB")));
}

#[test]
fn earliest_arrival_misses_departed_trip() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    // IC8 has left Olten before IC6 gets there from Liestal
    let result = planner.earliest_arrival(&request("Liestal", "Brig")).unwrap();

    assert_eq!(result.arrival_time, Minutes::new(611));
    assert_eq!(result.path.len(), 1);
    assert_eq!(trip_of(&result.path, 0), "IC6");
}

#[test]
fn earliest_arrival_with_transfer() {
    let graph = network_with_branch();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let result = planner
        .earliest_arrival(&request("Bern", "Interlaken"))
        .unwrap();

    assert_eq!(result.arrival_time, Minutes::new(545));
    assert_eq!(result.path.len(), 2);
    assert_eq!(result.path.transfer_count(), 1);
    assert_eq!(trip_of(&result.path, 0), "IC8");
    assert_eq!(trip_of(&result.path, 1), "S1");
}

#[test]
fn earliest_arrival_unreachable() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let result = planner.earliest_arrival(&request("Brig", "Bern")).unwrap();

    assert!(!result.is_reachable());
    assert_eq!(result.arrival_time, Minutes::INFINITY);
    assert!(result.path.is_empty());
}

#[test]
fn reliable_path_with_slack() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let result = planner
        .most_reliable_path(&request("Bern", "Brig"), Minutes::new(226))
        .unwrap();

    assert!(result.exhausted);
    assert_eq!(result.reliability(), 1.0);
    assert_eq!(result.arrival_time(), Some(Minutes::new(551)));
    let itinerary = result.itinerary().unwrap();
    assert_eq!(itinerary.len(), 1);
    assert_eq!(trip_of(itinerary, 0), "IC8");
}

#[test]
fn reliable_path_with_exact_budget() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    // Only the on-time IC8 sample makes 09:11
    let result = planner
        .most_reliable_path(&request("Bern", "Brig"), Minutes::new(151))
        .unwrap();

    assert_eq!(result.reliability(), 0.5);
    assert_eq!(result.arrival_time(), Some(Minutes::new(551)));
}

#[test]
fn reliable_path_ignores_dead_end_branch() {
    let graph = network_with_branch();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let result = planner
        .most_reliable_path(&request("Bern", "Brig"), Minutes::new(226))
        .unwrap();

    assert_eq!(result.reliability(), 1.0);
    let itinerary = result.itinerary().unwrap();
    let interlaken = StationId::from("Interlaken");
    assert!(itinerary.legs().iter().all(|leg| leg.to != interlaken));
}

#[test]
fn reliable_path_to_branch_line() {
    let graph = network_with_branch();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let result = planner
        .most_reliable_path(&request("Bern", "Interlaken"), Minutes::new(200))
        .unwrap();

    assert_eq!(result.reliability(), 1.0);
    let itinerary = result.itinerary().unwrap();
    assert_eq!(itinerary.destination(), Some(&StationId::from("Interlaken")));
    assert_eq!(itinerary.transfer_count(), 1);
}

#[test]
fn reliable_path_unreachable() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let result = planner
        .most_reliable_path(&request("Brig", "Bern"), Minutes::new(500))
        .unwrap();

    assert!(result.best.is_none());
    assert_eq!(result.reliability(), 0.0);
    assert_eq!(result.stats.expansions, 1);
}

#[test]
fn leg_limit_prunes_transfers() {
    let graph = swiss_reference_network();
    let config = SearchConfig {
        max_legs: 1,
        ..SearchConfig::default()
    };
    let planner = Planner::new(&graph, &config);

    let result = planner
        .most_reliable_path(&request("Bern", "Brig"), Minutes::new(226))
        .unwrap();

    assert!(result.stats.pruned_by_legs > 0);
    assert_eq!(result.reliability(), 1.0);
    assert_eq!(result.itinerary().unwrap().transfer_count(), 0);
}

#[test]
fn zero_leg_limit_finds_nothing() {
    let graph = swiss_reference_network();
    let config = SearchConfig {
        max_legs: 0,
        ..SearchConfig::default()
    };
    let planner = Planner::new(&graph, &config);

    let result = planner
        .most_reliable_path(&request("Bern", "Brig"), Minutes::new(226))
        .unwrap();

    assert!(result.best.is_none());
    assert_eq!(result.stats.pruned_by_legs, 2);
}

#[test]
fn seeded_incumbent_prunes_queue() {
    let graph = swiss_reference_network();
    let config = SearchConfig {
        seed_with_earliest_arrival: true,
        prune_below_incumbent: true,
        ..SearchConfig::default()
    };
    let planner = Planner::new(&graph, &config);

    let result = planner
        .most_reliable_path(&request("Bern", "Brig"), Minutes::new(226))
        .unwrap();

    assert_eq!(result.reliability(), 1.0);
    assert_eq!(result.arrival_time(), Some(Minutes::new(551)));
    assert!(result.stats.pruned_by_incumbent > 0);
    assert_eq!(result.stats.expansions, 1);
}

#[test]
fn seeding_alone_does_not_change_result() {
    let graph = swiss_reference_network();
    let plain = SearchConfig::default();
    let seeded = SearchConfig {
        seed_with_earliest_arrival: true,
        ..SearchConfig::default()
    };

    for budget in [151, 180, 226] {
        let budget = Minutes::new(budget);
        let a = Planner::new(&graph, &plain)
            .most_reliable_path(&request("Bern", "Brig"), budget)
            .unwrap();
        let b = Planner::new(&graph, &seeded)
            .most_reliable_path(&request("Bern", "Brig"), budget)
            .unwrap();
        assert_eq!(a.best, b.best);
    }
}

#[test]
fn expansion_cap_stops_early() {
    let graph = swiss_reference_network();
    let config = SearchConfig {
        max_expansions: Some(1),
        ..SearchConfig::default()
    };
    let planner = Planner::new(&graph, &config);

    let result = planner
        .most_reliable_path(&request("Bern", "Brig"), Minutes::new(226))
        .unwrap();

    assert!(!result.exhausted);
    assert_eq!(result.stats.expansions, 1);
    assert!(result.best.is_none());
}

#[test]
fn plan_runs_both_searches() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let plan = planner.plan(&request("Bern", "Brig")).unwrap();

    assert_eq!(plan.earliest.arrival_time, Minutes::new(551));
    assert_eq!(plan.earliest_reliability, 0.5);
    assert_eq!(plan.time_budget, Some(Minutes::new(226)));
    let reliable = plan.reliable.unwrap();
    assert_eq!(reliable.reliability(), 1.0);
}

#[test]
fn plan_unreachable() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();

    let plan = plan_journey(&graph, &request("Brig", "Bern"), &config).unwrap();

    assert!(!plan.earliest.is_reachable());
    assert_eq!(plan.earliest_reliability, 0.0);
    assert!(plan.time_budget.is_none());
    assert!(plan.reliable.is_none());
}

#[test]
fn plan_rejects_same_station() {
    let graph = swiss_reference_network();
    let config = SearchConfig::default();

    let err = plan_journey(&graph, &request("Bern", "Bern"), &config).unwrap_err();
    assert!(matches!(err, SearchError::InvalidRequest(_)));
}

#[test]
fn free_functions() {
    let graph = swiss_reference_network();

    let earliest =
        earliest_arrival(&graph, "Bern", "Brig", REFERENCE_START, Minutes::new(5)).unwrap();
    assert_eq!(earliest.arrival_time, Minutes::new(551));

    let reliable = most_reliable_path(
        &graph,
        "Bern",
        "Brig",
        REFERENCE_START,
        Minutes::new(151),
        Minutes::new(5),
    )
    .unwrap();
    assert_eq!(reliable.reliability(), 0.5);
}

#[test]
fn repeated_queries_agree() {
    let graph = network_with_branch();
    let config = SearchConfig::default();
    let planner = Planner::new(&graph, &config);

    let first = planner.plan(&request("Zürich HB", "Brig")).unwrap();
    let second = planner.plan(&request("Zürich HB", "Brig")).unwrap();

    assert_eq!(first.earliest, second.earliest);
    assert_eq!(first.earliest_reliability, second.earliest_reliability);
    assert_eq!(first.reliable, second.reliable);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// More budget never lowers the best reliability found.
        #[test]
        fn reliable_search_budget_monotone(budget in 0i64..300, extra in 0i64..150) {
            let graph = swiss_reference_network();
            let config = SearchConfig::default();
            let planner = Planner::new(&graph, &config);

            let tight = planner
                .most_reliable_path(&request("Bern", "Brig"), Minutes::new(budget))
                .unwrap();
            let loose = planner
                .most_reliable_path(&request("Bern", "Brig"), Minutes::new(budget + extra))
                .unwrap();

            prop_assert!(loose.reliability() + 1e-12 >= tight.reliability());
        }

        /// Earliest-arrival paths start no earlier than asked and end at
        /// the reported arrival.
        #[test]
        fn earliest_path_consistent(start in 300i64..700) {
            let graph = swiss_reference_network();
            let config = SearchConfig::default();
            let planner = Planner::new(&graph, &config);

            let result = planner
                .earliest_arrival(&JourneyRequest::new("Bern", "Brig", start))
                .unwrap();

            if result.is_reachable() {
                prop_assert!(result.path.departure_time().unwrap() >= Minutes::new(start));
                prop_assert_eq!(result.path.arrival_time(), Some(result.arrival_time));
                prop_assert_eq!(result.path.origin(), Some(&StationId::from("Bern")));
                prop_assert_eq!(result.path.destination(), Some(&StationId::from("Brig")));
            } else {
                prop_assert!(start > 547);
            }
        }

        /// Same query, same answer.
        #[test]
        fn searches_deterministic(start in 380i64..560, budget in 100i64..300) {
            let graph = network_with_branch();
            let config = SearchConfig::default();
            let planner = Planner::new(&graph, &config);
            let request = JourneyRequest::new("Olten", "Brig", start);

            let a = planner.earliest_arrival(&request).unwrap();
            let b = planner.earliest_arrival(&request).unwrap();
            prop_assert_eq!(a, b);

            let a = planner.most_reliable_path(&request, Minutes::new(budget)).unwrap();
            let b = planner.most_reliable_path(&request, Minutes::new(budget)).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
