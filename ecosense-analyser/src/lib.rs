pub mod detector;
pub mod rules;

pub use detector::{Detection, OccupancyDetector, RandomDetector};
pub use rules::{Observation, evaluate};
