use crate::access::UnresolvableLocation;
use crate::model::TimetableError;

/// query-facing failures. `NoRouteFound` is an expected outcome of a valid
/// query, not a defect; callers branch on it rather than logging it as an
/// error.
#[derive(thiserror::Error, Debug)]
pub enum JourneyError {
    #[error("invalid feed data: {0}")]
    InvalidFeedData(#[from] TimetableError),
    #[error(transparent)]
    UnresolvableLocation(#[from] UnresolvableLocation),
    #[error("no route found")]
    NoRouteFound,
}
