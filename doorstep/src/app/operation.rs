//! door-to-door planning operations over prepared transit datasets. the
//! dataset directory layout (stops.csv, connections.csv) is produced by
//! the upstream feed tooling; everything here replays it through the core
//! and runs queries against it.
use crate::dataset::{parse_service_time, read_rows, Dataset, QueryRow};
use crate::render;
use clap::Subcommand;
use doorstep_core::access::{HaversineWalkRouter, NetworkAccessResolver};
use doorstep_core::engine::{JourneyError, JourneyPlanner, JourneyRequest, ScanLimits, ScanState};
use doorstep_core::model::{FeedId, Time};
use doorstep_core::transfer::{ProfileId, ProfileRegistry, TransferTable, TransferTableBuilder};
use geo::{point, Point};
use itertools::Itertools;
use kdam::{Bar, BarExt};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum JourneyOperation {
    /// plan a single door-to-door journey
    Plan {
        /// directory holding stops.csv and connections.csv
        #[arg(long)]
        dataset: PathBuf,
        /// origin coordinate as lon,lat
        #[arg(long)]
        origin: String,
        /// destination coordinate as lon,lat
        #[arg(long)]
        destination: String,
        /// departure clock reading, H:MM:SS
        #[arg(long)]
        departure: String,
        /// walking speed in meters per second
        #[arg(long, default_value_t = 1.4)]
        walk_speed: f64,
        /// access/egress stop search radius in meters
        #[arg(long, default_value_t = 500.0)]
        search_radius: f64,
        /// maximum walking transfer duration to materialize, in seconds
        #[arg(long, default_value_t = 900)]
        max_transfer: Time,
        /// optional cap on scanned connections
        #[arg(long)]
        max_scanned_connections: Option<usize>,
        /// emit the itinerary as json instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// plan a csv of queries in parallel
    Batch {
        /// directory holding stops.csv and connections.csv
        #[arg(long)]
        dataset: PathBuf,
        /// csv of queries with columns origin_lon, origin_lat,
        /// destination_lon, destination_lat, departure
        #[arg(long)]
        queries: PathBuf,
        #[arg(long, default_value_t = 1)]
        parallelism: usize,
        /// walking speed in meters per second
        #[arg(long, default_value_t = 1.4)]
        walk_speed: f64,
        /// access/egress stop search radius in meters
        #[arg(long, default_value_t = 500.0)]
        search_radius: f64,
        /// maximum walking transfer duration to materialize, in seconds
        #[arg(long, default_value_t = 900)]
        max_transfer: Time,
    },
    /// summarize the stops, trips, connections, and service span of a
    /// prepared dataset
    Summary {
        #[arg(long)]
        dataset: PathBuf,
    },
}

impl JourneyOperation {
    pub fn run(&self) {
        match self {
            JourneyOperation::Plan {
                dataset,
                origin,
                destination,
                departure,
                walk_speed,
                search_radius,
                max_transfer,
                max_scanned_connections,
                json,
            } => {
                let dataset = Dataset::load(dataset).expect("failed loading dataset");
                let (planner, profile) =
                    build_planner(&dataset, *walk_speed, *search_radius, *max_transfer);
                let request = JourneyRequest {
                    origin: parse_coordinate(origin).expect("malformed --origin, expected lon,lat"),
                    destination: parse_coordinate(destination)
                        .expect("malformed --destination, expected lon,lat"),
                    departure_time: parse_service_time(departure)
                        .expect("malformed --departure, expected H:MM:SS"),
                    profile,
                    limits: ScanLimits {
                        max_scanned_connections: *max_scanned_connections,
                        max_departure_time: None,
                    },
                };
                plan(&planner, &dataset, &request, *json)
            }
            JourneyOperation::Batch {
                dataset,
                queries,
                parallelism,
                walk_speed,
                search_radius,
                max_transfer,
            } => {
                let dataset = Dataset::load(dataset).expect("failed loading dataset");
                let rows: Vec<QueryRow> = read_rows(queries).expect("failed reading queries");
                let (planner, profile) =
                    build_planner(&dataset, *walk_speed, *search_radius, *max_transfer);
                batch(&planner, &dataset, profile, &rows, *parallelism)
            }
            JourneyOperation::Summary { dataset } => {
                let dataset = Dataset::load(dataset).expect("failed loading dataset");
                summarize(&dataset)
            }
        }
    }
}

type StandardPlanner = JourneyPlanner<NetworkAccessResolver<HaversineWalkRouter>>;

fn build_planner(
    dataset: &Dataset,
    walk_speed: f64,
    search_radius: f64,
    max_transfer: Time,
) -> (StandardPlanner, ProfileId) {
    let mut profiles = ProfileRegistry::new();
    let profile = profiles.register("walk");
    let router = HaversineWalkRouter::new(walk_speed);
    let mut transfers = TransferTable::new();
    TransferTableBuilder::new(max_transfer).build(
        &dataset.timetable,
        &router,
        profile,
        &mut transfers,
    );
    let resolver = NetworkAccessResolver::new(&dataset.timetable, router, search_radius);
    let planner = JourneyPlanner::new(
        dataset.timetable.clone(),
        Arc::new(transfers),
        resolver,
    );
    (planner, profile)
}

fn parse_coordinate(text: &str) -> Option<Point<f64>> {
    let (lon, lat) = text.split_once(',')?;
    let lon: f64 = lon.trim().parse().ok()?;
    let lat: f64 = lat.trim().parse().ok()?;
    Some(point! { x: lon, y: lat })
}

fn plan(planner: &StandardPlanner, dataset: &Dataset, request: &JourneyRequest, json: bool) {
    match planner.plan(request) {
        Ok(itinerary) if json => println!(
            "{}",
            serde_json::to_string_pretty(&itinerary).expect("itinerary serializes")
        ),
        Ok(itinerary) => println!("{}", render::render_itinerary(&itinerary, dataset)),
        Err(JourneyError::NoRouteFound) => println!("no route found"),
        Err(e) => {
            log::error!("planning failed: {e}");
            std::process::exit(1);
        }
    }
}

fn batch(
    planner: &StandardPlanner,
    dataset: &Dataset,
    profile: ProfileId,
    rows: &[QueryRow],
    parallelism: usize,
) {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .build()
        .expect("failed building thread pool");
    let bar = Mutex::new(
        Bar::builder()
            .total(rows.len())
            .desc("planning")
            .build()
            .expect("failed building progress bar"),
    );
    let results: Vec<String> = pool.install(|| {
        rows.par_iter()
            .map_init(
                || planner.scratch(),
                |state, row| {
                    let line = run_query(planner, dataset, profile, state, row);
                    if let Ok(mut bar) = bar.lock() {
                        let _ = bar.update(1);
                    }
                    line
                },
            )
            .collect()
    });
    for line in results {
        println!("{line}");
    }
}

fn run_query(
    planner: &StandardPlanner,
    dataset: &Dataset,
    profile: ProfileId,
    state: &mut ScanState,
    row: &QueryRow,
) -> String {
    let departure_time = match parse_service_time(&row.departure) {
        Ok(time) => time,
        Err(e) => return format!("error: {e}"),
    };
    let request = JourneyRequest {
        origin: point! { x: row.origin_lon, y: row.origin_lat },
        destination: point! { x: row.destination_lon, y: row.destination_lat },
        departure_time,
        profile,
        limits: ScanLimits::default(),
    };
    match planner.plan_with(&request, state) {
        Ok(itinerary) => {
            let rides = itinerary
                .legs
                .iter()
                .filter(|leg| matches!(leg, doorstep_core::engine::Leg::Ride { .. }))
                .count();
            format!(
                "depart {} arrive {} ({} rides, total {}s)",
                render::format_service_time(itinerary.departure_time),
                render::format_service_time(itinerary.arrival_time),
                rides,
                itinerary.total_duration()
            )
        }
        Err(JourneyError::NoRouteFound) => String::from("no route found"),
        Err(e) => format!("error: {e}"),
    }
}

fn summarize(dataset: &Dataset) {
    let timetable = &dataset.timetable;
    println!(
        "{} feeds, {} stops, {} trips, {} connections",
        timetable.feed_count(),
        timetable.stop_count(),
        timetable.trip_count(),
        timetable.connections().len()
    );
    for index in 0..timetable.feed_count() {
        let feed = FeedId(index);
        let stops = timetable.stops().iter().filter(|s| s.feed == feed).count();
        let trips = timetable.trips().iter().filter(|t| t.feed == feed).count();
        let connections = timetable
            .connections()
            .iter()
            .filter(|c| c.feed == feed)
            .collect_vec();
        let span = connections
            .iter()
            .flat_map(|c| [c.departure_time, c.arrival_time])
            .minmax();
        let service = match span {
            itertools::MinMaxResult::NoElements => String::from("no service"),
            itertools::MinMaxResult::OneElement(t) => render::format_service_time(t),
            itertools::MinMaxResult::MinMax(first, last) => format!(
                "service {} - {}",
                render::format_service_time(first),
                render::format_service_time(last)
            ),
        };
        println!(
            "{} ({}): {} stops, {} trips, {} connections, {}",
            dataset.feed_name(feed),
            feed,
            stops,
            trips,
            connections.len(),
            service
        );
    }
}
