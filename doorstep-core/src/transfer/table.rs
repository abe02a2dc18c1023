use super::ProfileId;
use crate::access::{StopIndex, WalkRouter};
use crate::model::{StopId, Time, Timetable};
use std::collections::HashMap;

/// precomputed walking durations between pairs of stops, keyed by profile
/// and source stop. entries are directional; a missing entry means "no
/// direct transfer known", never a zero-duration one. read-only at query
/// time.
#[derive(Debug, Default)]
pub struct TransferTable {
    by_profile: Vec<HashMap<StopId, Vec<(StopId, Time)>>>,
}

impl TransferTable {
    pub fn new() -> TransferTable {
        TransferTable::default()
    }

    /// registers a directional transfer. builder-side only.
    pub fn insert(&mut self, profile: ProfileId, from: StopId, to: StopId, duration: Time) {
        if self.by_profile.len() <= profile.0 {
            self.by_profile.resize_with(profile.0 + 1, HashMap::new);
        }
        self.by_profile[profile.0]
            .entry(from)
            .or_default()
            .push((to, duration));
    }

    pub fn lookup(&self, profile: ProfileId, from: StopId, to: StopId) -> Option<Time> {
        self.from_stop(profile, from)
            .iter()
            .find(|(target, _)| *target == to)
            .map(|(_, duration)| *duration)
    }

    /// all transfers leaving `from` under `profile`; the scan's propagation
    /// step iterates this.
    pub fn from_stop(&self, profile: ProfileId, from: StopId) -> &[(StopId, Time)] {
        self.by_profile
            .get(profile.0)
            .and_then(|adjacency| adjacency.get(&from))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn entry_count(&self) -> usize {
        self.by_profile
            .iter()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }
}

/// precomputation collaborator: materializes every stop-to-stop walk within
/// a maximum transfer duration for one profile. pairs whose walk exceeds
/// the bound are refused outright.
#[derive(Debug, Clone, Copy)]
pub struct TransferTableBuilder {
    pub max_duration: Time,
}

impl TransferTableBuilder {
    pub fn new(max_duration: Time) -> TransferTableBuilder {
        TransferTableBuilder { max_duration }
    }

    /// appends `profile`'s transfers into `table` using `router` to price
    /// walks between stops proposed by a spatial prequery.
    pub fn build<R: WalkRouter>(
        &self,
        timetable: &Timetable,
        router: &R,
        profile: ProfileId,
        table: &mut TransferTable,
    ) {
        let index = StopIndex::new(timetable.stops());
        let radius = router.coverage_radius(self.max_duration);
        let mut materialized = 0usize;
        for stop in timetable.stops() {
            for (target, _) in index.within_radius(stop.location, radius) {
                if target == stop.id {
                    continue;
                }
                let target_location = match timetable.stop(target) {
                    Some(s) => s.location,
                    None => continue,
                };
                if let Some(duration) = router.walking_time(stop.location, target_location) {
                    if duration <= self.max_duration {
                        table.insert(profile, stop.id, target, duration);
                        materialized += 1;
                    }
                }
            }
        }
        log::info!(
            "materialized {} transfers for {} (max {}s)",
            materialized,
            profile,
            self.max_duration
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::access::HaversineWalkRouter;
    use crate::model::TimetableBuilder;
    use geo::point;

    #[test]
    fn test_lookup_is_directional() {
        let mut table = TransferTable::new();
        table.insert(ProfileId(0), StopId(1), StopId(2), 120);
        assert_eq!(table.lookup(ProfileId(0), StopId(1), StopId(2)), Some(120));
        assert_eq!(table.lookup(ProfileId(0), StopId(2), StopId(1)), None);
        assert_eq!(table.lookup(ProfileId(1), StopId(1), StopId(2)), None);
    }

    #[test]
    fn test_missing_entry_yields_empty_slice() {
        let table = TransferTable::new();
        assert!(table.from_stop(ProfileId(0), StopId(7)).is_empty());
        assert_eq!(table.lookup(ProfileId(0), StopId(7), StopId(8)), None);
    }

    #[test]
    fn test_builder_refuses_transfers_beyond_bound() {
        let mut builder = TimetableBuilder::new();
        let feed = builder.register_feed();
        // ~111m, ~334m, and ~3.3km from the first stop
        builder.add_stop(feed, point! { x: 0.0, y: 0.0 }).unwrap();
        builder.add_stop(feed, point! { x: 0.0, y: 0.001 }).unwrap();
        builder.add_stop(feed, point! { x: 0.0, y: 0.003 }).unwrap();
        builder.add_stop(feed, point! { x: 0.0, y: 0.03 }).unwrap();
        let timetable = builder.finalize().unwrap();

        let profile = ProfileId(0);
        let mut table = TransferTable::new();
        // 1 m/s walker bounded at 400s reaches the near neighbors only
        TransferTableBuilder::new(400).build(
            &timetable,
            &HaversineWalkRouter::new(1.0),
            profile,
            &mut table,
        );

        assert!(table.lookup(profile, StopId(0), StopId(1)).is_some());
        assert!(table.lookup(profile, StopId(0), StopId(2)).is_some());
        assert_eq!(table.lookup(profile, StopId(0), StopId(3)), None);
        // no self transfers
        assert_eq!(table.lookup(profile, StopId(0), StopId(0)), None);
    }
}
