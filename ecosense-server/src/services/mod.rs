pub mod activity_service;
pub mod analysis_service;
pub mod auto_cycle_service;
pub mod camera_service;
pub mod clock;
pub mod rate_limit_service;
pub mod room_service;
pub mod task_scheduler;
pub mod telemetry_service;
pub mod vision_service;

pub use activity_service::ActivityService;
pub use analysis_service::{AnalysisService, AnalyzeOutcome, ResultSource};
pub use auto_cycle_service::AutoCycleService;
pub use camera_service::{CameraFeed, CameraStatus, FrameSource};
pub use rate_limit_service::RateLimitService;
pub use room_service::RoomService;
pub use task_scheduler::{FirstTick, TaskKind, TaskScheduler};
pub use telemetry_service::TelemetryService;
pub use vision_service::{GeminiClient, ImageSource, VisionRequest, VisionService};
