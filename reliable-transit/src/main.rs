use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use reliable_transit::domain::{Minutes, TimeError};
use reliable_transit::graph::{LoadError, TimeDependentGraph, load_graph};
use reliable_transit::network::{REFERENCE_START, swiss_reference_network};
use reliable_transit::planner::{JourneyPlan, JourneyRequest, Planner, SearchConfig, SearchError};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("usage: reliable-transit [GRAPH_JSON ORIGIN DESTINATION HH:MM]")]
    Usage,

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Planning failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), AppError> {
    let (graph, request) = match args.as_slice() {
        [] => {
            info!("No graph given, using the Swiss reference network");
            (
                swiss_reference_network(),
                JourneyRequest::new("Bern", "Brig", REFERENCE_START),
            )
        }
        [path, origin, destination, time] => {
            let start_time = Minutes::parse_hhmm(time)?;
            let graph: TimeDependentGraph = load_graph(path)?;
            (
                graph,
                JourneyRequest::new(origin.as_str(), destination.as_str(), start_time),
            )
        }
        _ => return Err(AppError::Usage),
    };

    let config = SearchConfig::default();
    let plan = Planner::new(&graph, &config).plan(&request)?;
    print_plan(&request, &plan);
    Ok(())
}

fn print_plan(request: &JourneyRequest, plan: &JourneyPlan) {
    println!(
        "{} to {}, leaving after {}",
        request.origin, request.destination, request.start_time
    );
    println!();

    if !plan.earliest.is_reachable() {
        println!("No path found.");
        return;
    }

    println!("Earliest arrival: {}", plan.earliest.arrival_time);
    println!("{}", plan.earliest.path);
    println!(
        "Reliability with no slack: {:.1}%",
        plan.earliest_reliability * 100.0
    );
    println!();

    let (Some(budget), Some(reliable)) = (plan.time_budget, &plan.reliable) else {
        return;
    };
    match &reliable.best {
        Some(best) => {
            println!(
                "Most reliable within {} minutes: {:.1}%, arriving {}",
                budget.get(),
                best.reliability * 100.0,
                best.arrival_time
            );
            println!("{}", best.itinerary);
        }
        None => println!("No reliable path found within {} minutes.", budget.get()),
    }
    if !reliable.exhausted {
        println!("(search stopped early after {} expansions)", reliable.stats.expansions);
    }
}
