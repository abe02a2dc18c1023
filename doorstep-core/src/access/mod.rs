mod resolver;
mod stop_index;
mod walk_router;

pub use resolver::{
    AccessCandidate, AccessDirection, AccessResolver, NetworkAccessResolver, UnresolvableLocation,
};
pub use stop_index::StopIndex;
pub use walk_router::{HaversineWalkRouter, WalkRouter};
