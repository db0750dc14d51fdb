mod camera_handle;
mod control_handle;
mod preference_handle;
mod room_handle;
pub mod sse_handle;
mod telemetry_handle;

pub use camera_handle::*;
pub use control_handle::*;
pub use preference_handle::*;
pub use room_handle::*;
pub use sse_handle::*;
pub use telemetry_handle::*;
