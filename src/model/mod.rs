pub mod shot_quality;
pub mod threat;

pub use shot_quality::ShotModel;
pub use threat::{ThreatGrid, ThreatGridError};
