use super::state::{Reached, ScanState};
use crate::access::AccessCandidate;
use crate::model::{Time, Timetable, UNREACHED};
use crate::transfer::{ProfileId, TransferTable};
use serde::{Deserialize, Serialize};

/// optional caps a calling layer may apply up front instead of interrupting
/// a running scan. zero-configuration default scans to exhaustion.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanLimits {
    /// stop after this many scanned connections.
    pub max_scanned_connections: Option<usize>,
    /// ignore connections departing after this time.
    pub max_departure_time: Option<Time>,
}

/// the destination candidate the scan settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanOutcome {
    pub egress: AccessCandidate,
    /// earliest arrival at the egress candidate's stop.
    pub stop_arrival: Time,
    /// `stop_arrival` plus the egress walk.
    pub final_arrival: Time,
}

/// single forward pass over the timetable's scan-ordered connections,
/// propagating earliest arrivals through trips and transfers from the
/// seeded origin candidates. returns the best egress candidate, or `None`
/// when no destination candidate was ever reached.
pub(crate) fn scan(
    timetable: &Timetable,
    transfers: &TransferTable,
    profile: ProfileId,
    origins: &[AccessCandidate],
    destinations: &[AccessCandidate],
    departure: Time,
    limits: ScanLimits,
    state: &mut ScanState,
) -> Option<ScanOutcome> {
    state.reset();

    let mut earliest_access = UNREACHED;
    for candidate in origins {
        let reached_at = departure.saturating_add(candidate.duration);
        if reached_at == UNREACHED {
            continue;
        }
        state.improve(
            candidate.stop,
            reached_at,
            Reached::InitialAccess {
                walk: candidate.duration,
            },
        );
        earliest_access = earliest_access.min(reached_at);
    }

    if earliest_access != UNREACHED {
        let connections = timetable.connections();
        let start = timetable.first_departure_at_or_after(earliest_access);
        let mut scanned = 0usize;

        for (index, connection) in connections.iter().enumerate().skip(start) {
            if limits
                .max_scanned_connections
                .is_some_and(|cap| scanned >= cap)
            {
                log::debug!("scan capped after {scanned} connections");
                break;
            }
            if limits
                .max_departure_time
                .is_some_and(|cutoff| connection.departure_time > cutoff)
            {
                break;
            }
            // once every destination candidate is reached by this departure
            // time, no unscanned connection can improve the answer
            if destinations
                .iter()
                .all(|d| state.arrival(d.stop) <= connection.departure_time)
            {
                break;
            }
            scanned += 1;

            let already_boarded = state.boarding(connection.trip).is_some();
            if !already_boarded
                && state.arrival(connection.departure_stop) > connection.departure_time
            {
                // unreachable: neither aboard the trip nor at the platform
                // in time
                continue;
            }
            if !already_boarded {
                state.mark_boarded(connection.trip, index);
            }

            let improved = state.improve(
                connection.arrival_stop,
                connection.arrival_time,
                Reached::ViaConnection { connection: index },
            );
            if improved {
                for &(target, walk) in transfers.from_stop(profile, connection.arrival_stop) {
                    state.improve(
                        target,
                        connection.arrival_time.saturating_add(walk),
                        Reached::ViaTransfer {
                            from: connection.arrival_stop,
                            walk,
                        },
                    );
                }
            }
        }
    }

    destinations
        .iter()
        .filter_map(|candidate| {
            let stop_arrival = state.arrival(candidate.stop);
            if stop_arrival == UNREACHED {
                return None;
            }
            Some(ScanOutcome {
                egress: *candidate,
                stop_arrival,
                final_arrival: stop_arrival.saturating_add(candidate.duration),
            })
        })
        .min_by_key(|outcome| {
            (
                outcome.final_arrival,
                outcome.stop_arrival,
                outcome.egress.stop,
            )
        })
}
