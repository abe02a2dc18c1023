mod journey_app;
mod operation;

pub use journey_app::JourneyApp;
pub use operation::JourneyOperation;
