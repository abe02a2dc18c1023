//! plain-text rendering of planned journeys. anything structured goes
//! through serde instead; this is for eyeballs.

use crate::dataset::Dataset;
use doorstep_core::engine::{Itinerary, Leg};
use doorstep_core::model::Time;

/// formats seconds-since-service-day as an H:MM:SS clock reading. hours
/// run past 23 for times after midnight, matching the dataset files.
pub fn format_service_time(time: Time) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time / 3600,
        time % 3600 / 60,
        time % 60
    )
}

fn format_duration(seconds: Time) -> String {
    if seconds >= 60 {
        format!("{}m{:02}s", seconds / 60, seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

pub fn render_itinerary(itinerary: &Itinerary, dataset: &Dataset) -> String {
    let mut lines = vec![format!(
        "depart {}",
        format_service_time(itinerary.departure_time)
    )];
    for leg in &itinerary.legs {
        match leg {
            Leg::Walk {
                from,
                to,
                departure_time,
                duration,
            } => {
                let from_name = from.map(|s| dataset.stop_name(s)).unwrap_or("origin");
                let to_name = to.map(|s| dataset.stop_name(s)).unwrap_or("destination");
                lines.push(format!(
                    "{}  walk {} from {} to {}",
                    format_service_time(*departure_time),
                    format_duration(*duration),
                    from_name,
                    to_name,
                ));
            }
            Leg::Ride {
                trip,
                board_stop,
                board_time,
                alight_stop,
                alight_time,
            } => {
                lines.push(format!(
                    "{}  ride {} from {} to {}, arriving {}",
                    format_service_time(*board_time),
                    dataset.trip_name(*trip),
                    dataset.stop_name(*board_stop),
                    dataset.stop_name(*alight_stop),
                    format_service_time(*alight_time),
                ));
            }
        }
    }
    lines.push(format!(
        "arrive {} (total {})",
        format_service_time(itinerary.arrival_time),
        format_duration(itinerary.total_duration())
    ));
    lines.join("\n")
}
