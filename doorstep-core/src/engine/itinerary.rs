use super::scan::ScanOutcome;
use super::state::{Reached, ScanState};
use crate::model::{StopId, Time, Timetable, TripId};
use serde::Serialize;

/// one step of a journey. walk legs with `from: None` start at the query
/// origin; `to: None` ends at the query destination.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Walk {
        from: Option<StopId>,
        to: Option<StopId>,
        departure_time: Time,
        duration: Time,
    },
    Ride {
        trip: TripId,
        board_stop: StopId,
        board_time: Time,
        alight_stop: StopId,
        alight_time: Time,
    },
}

/// a complete door-to-door journey. immutable once built; consumers render
/// or serialize it however they like.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    pub legs: Vec<Leg>,
    pub departure_time: Time,
    pub arrival_time: Time,
}

impl Itinerary {
    pub fn total_duration(&self) -> Time {
        self.arrival_time - self.departure_time
    }
}

/// walks back-pointers from the chosen egress stop to an origin access
/// seed, reversing into forward order. consecutive connections of one trip
/// collapse into a single ride leg by jumping to the trip's boarding
/// connection. zero-duration walks are dropped, so a destination that
/// resolves to the origin stop itself yields an empty leg list.
pub(crate) fn build_itinerary(
    timetable: &Timetable,
    state: &ScanState,
    query_departure: Time,
    outcome: &ScanOutcome,
) -> Itinerary {
    let connections = timetable.connections();
    let mut legs = Vec::new();

    if outcome.egress.duration > 0 {
        legs.push(Leg::Walk {
            from: Some(outcome.egress.stop),
            to: None,
            departure_time: outcome.stop_arrival,
            duration: outcome.egress.duration,
        });
    }

    let mut cursor = outcome.egress.stop;
    loop {
        match state.reached(cursor) {
            Reached::InitialAccess { walk } => {
                if walk > 0 {
                    legs.push(Leg::Walk {
                        from: None,
                        to: Some(cursor),
                        departure_time: query_departure,
                        duration: walk,
                    });
                }
                break;
            }
            Reached::ViaConnection { connection } => {
                let alight = &connections[connection];
                // the first reachable connection of the trip is where the
                // rider actually boarded
                let board_index = state.boarding(alight.trip).unwrap_or(connection);
                let board = &connections[board_index];
                legs.push(Leg::Ride {
                    trip: alight.trip,
                    board_stop: board.departure_stop,
                    board_time: board.departure_time,
                    alight_stop: alight.arrival_stop,
                    alight_time: alight.arrival_time,
                });
                cursor = board.departure_stop;
            }
            Reached::ViaTransfer { from, walk } => {
                if walk > 0 {
                    legs.push(Leg::Walk {
                        from: Some(from),
                        to: Some(cursor),
                        departure_time: state.arrival(cursor) - walk,
                        duration: walk,
                    });
                }
                cursor = from;
            }
            Reached::Unreached => {
                // the scan only ever hands over reached destinations, and
                // every back-pointer chain ends at an access seed
                debug_assert!(false, "back-pointer chain hit an unreached stop");
                log::error!("itinerary reconstruction hit unreached {cursor}");
                break;
            }
        }
    }

    legs.reverse();
    Itinerary {
        legs,
        departure_time: query_departure,
        arrival_time: outcome.final_arrival,
    }
}
