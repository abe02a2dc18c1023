use serde::{Deserialize, Serialize};

/// identifies one independently-sourced timetable dataset registered with
/// the [`super::Timetable`]. assigned densely at registration time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeedId(pub usize);

impl std::fmt::Display for FeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "feed {}", self.0)
    }
}
