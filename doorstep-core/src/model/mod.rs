mod connection;
mod feed;
mod stop;
mod timetable;
mod timetable_error;
mod trip;

pub use connection::Connection;
pub use feed::FeedId;
pub use stop::{Stop, StopId};
pub use timetable::{Timetable, TimetableBuilder};
pub use timetable_error::TimetableError;
pub use trip::{Trip, TripId};

/// seconds since the service-day epoch of the query. connections that run
/// past midnight simply carry values beyond 86400.
pub type Time = u32;

/// sentinel for "not reached yet" in scan state.
pub const UNREACHED: Time = Time::MAX;
