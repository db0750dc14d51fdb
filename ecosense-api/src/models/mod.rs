mod activity;
mod analysis;
mod control;
mod device;
mod energy;
mod preference;
mod rate_limit;
mod room;

pub use activity::*;
pub use analysis::*;
pub use control::*;
pub use device::*;
pub use energy::*;
pub use preference::*;
pub use rate_limit::*;
pub use room::*;

/// Rooms and devices are addressed by their configured string identifiers, e.g. `room-101`.
pub type Id = String;
