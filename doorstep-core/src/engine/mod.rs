mod itinerary;
mod journey_error;
mod planner;
mod scan;
mod state;

pub use itinerary::{Itinerary, Leg};
pub use journey_error::JourneyError;
pub use planner::{JourneyPlanner, JourneyRequest};
pub use scan::ScanLimits;
pub use state::{Reached, ScanState};
