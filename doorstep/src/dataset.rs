//! prepared-dataset loading. feed ingestion proper (GTFS parsing, archive
//! handling) happens upstream; this module only reads the flat CSV files
//! that tooling emits and replays them through the core's batch
//! registration interface.

use doorstep_core::model::{FeedId, StopId, Time, Timetable, TimetableBuilder, TimetableError, TripId};
use geo::point;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// a row in stops.csv.
#[derive(Debug, Deserialize)]
pub struct StopRow {
    pub feed: String,
    pub stop: String,
    pub lon: f64,
    pub lat: f64,
}

/// a row in connections.csv. times are service-day clock strings and may
/// run past 24:00:00 for trips crossing midnight.
#[derive(Debug, Deserialize)]
pub struct ConnectionRow {
    pub feed: String,
    pub trip: String,
    pub from_stop: String,
    pub departure: String,
    pub to_stop: String,
    pub arrival: String,
}

/// a row in a batch query file.
#[derive(Debug, Deserialize)]
pub struct QueryRow {
    pub origin_lon: f64,
    pub origin_lat: f64,
    pub destination_lon: f64,
    pub destination_lat: f64,
    pub departure: String,
}

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("failed reading {path}: {source}")]
    Read { path: String, source: csv::Error },
    #[error("malformed service time {0:?}, expected H:MM:SS")]
    MalformedTime(String),
    #[error("connection row references unknown {kind} {name:?} in feed {feed:?}")]
    UnknownReference {
        kind: &'static str,
        name: String,
        feed: String,
    },
    #[error(transparent)]
    Timetable(#[from] TimetableError),
}

/// the finalized timetable plus the source names the core's dense ids
/// replaced, kept around for rendering.
pub struct Dataset {
    pub timetable: Arc<Timetable>,
    stop_names: Vec<String>,
    trip_names: Vec<String>,
    feed_names: Vec<String>,
}

impl Dataset {
    /// loads `stops.csv` and `connections.csv` from `dir` and replays them
    /// through the timetable builder.
    pub fn load(dir: &Path) -> Result<Dataset, DatasetError> {
        let stop_rows: Vec<StopRow> = read_rows(&dir.join("stops.csv"))?;
        let connection_rows: Vec<ConnectionRow> = read_rows(&dir.join("connections.csv"))?;

        let mut builder = TimetableBuilder::new();
        let mut feeds: HashMap<String, FeedId> = HashMap::new();
        let mut feed_names = Vec::new();
        let mut stops: HashMap<(FeedId, String), StopId> = HashMap::new();
        let mut stop_names = Vec::new();
        let mut trips: HashMap<(FeedId, String), TripId> = HashMap::new();
        let mut trip_names = Vec::new();

        for row in &stop_rows {
            let feed = *feeds.entry(row.feed.clone()).or_insert_with(|| {
                feed_names.push(row.feed.clone());
                builder.register_feed()
            });
            let id = builder.add_stop(feed, point! { x: row.lon, y: row.lat })?;
            stops.insert((feed, row.stop.clone()), id);
            stop_names.push(row.stop.clone());
        }

        for row in &connection_rows {
            let feed = *feeds
                .get(&row.feed)
                .ok_or_else(|| DatasetError::UnknownReference {
                    kind: "feed",
                    name: row.feed.clone(),
                    feed: row.feed.clone(),
                })?;
            let trip = *trips.entry((feed, row.trip.clone())).or_insert_with(|| {
                trip_names.push(row.trip.clone());
                // feed was just looked up, so registration cannot fail
                builder.add_trip(feed).expect("trip registration for known feed")
            });
            let from = resolve_stop(&stops, feed, &row.from_stop, &row.feed)?;
            let to = resolve_stop(&stops, feed, &row.to_stop, &row.feed)?;
            builder.add_connection(
                feed,
                from,
                parse_service_time(&row.departure)?,
                to,
                parse_service_time(&row.arrival)?,
                trip,
            )?;
        }

        let timetable = builder.finalize()?;
        log::info!(
            "loaded dataset from {}: {} feeds, {} stops, {} connections",
            dir.display(),
            timetable.feed_count(),
            timetable.stop_count(),
            timetable.connections().len()
        );
        Ok(Dataset {
            timetable: Arc::new(timetable),
            stop_names,
            trip_names,
            feed_names,
        })
    }

    pub fn stop_name(&self, id: StopId) -> &str {
        self.stop_names.get(id.0).map(String::as_str).unwrap_or("?")
    }

    pub fn trip_name(&self, id: TripId) -> &str {
        self.trip_names.get(id.0).map(String::as_str).unwrap_or("?")
    }

    pub fn feed_name(&self, id: FeedId) -> &str {
        self.feed_names.get(id.0).map(String::as_str).unwrap_or("?")
    }
}

pub fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Read {
        path: path.display().to_string(),
        source,
    })?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|source| DatasetError::Read {
            path: path.display().to_string(),
            source,
        })
}

fn resolve_stop(
    stops: &HashMap<(FeedId, String), StopId>,
    feed: FeedId,
    name: &str,
    feed_name: &str,
) -> Result<StopId, DatasetError> {
    stops
        .get(&(feed, name.to_string()))
        .copied()
        .ok_or_else(|| DatasetError::UnknownReference {
            kind: "stop",
            name: name.to_string(),
            feed: feed_name.to_string(),
        })
}

/// parses an H:MM:SS service-day clock reading into seconds. hours may
/// exceed 23 for times past midnight.
pub fn parse_service_time(text: &str) -> Result<Time, DatasetError> {
    let malformed = || DatasetError::MalformedTime(text.to_string());
    let mut parts = text.split(':');
    let hours: Time = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(malformed)?;
    let minutes: Time = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(malformed)?;
    let seconds: Time = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(malformed)?;
    if parts.next().is_some() || minutes > 59 || seconds > 59 {
        return Err(malformed());
    }
    Ok(hours * 3600 + minutes * 60 + seconds)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_service_time() {
        assert_eq!(parse_service_time("08:00:00").unwrap(), 28800);
        assert_eq!(parse_service_time("0:00:30").unwrap(), 30);
        // past-midnight reading from an overnight trip
        assert_eq!(parse_service_time("25:30:00").unwrap(), 91800);
    }

    #[test]
    fn test_parse_service_time_rejects_garbage() {
        for text in ["", "08:00", "08:00:00:00", "8:61:00", "8:00:61", "abc"] {
            assert!(
                parse_service_time(text).is_err(),
                "{text:?} should not parse"
            );
        }
    }
}
