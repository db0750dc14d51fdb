use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use ecosense_analyser::{OccupancyDetector, RandomDetector};
use ecosense_api::models::Severity;
use tokio::sync::broadcast::{self, Sender};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::{PreferenceStore, Settings};
use crate::errors::VisionError;
use crate::handles::*;
use crate::services::analysis_service::SYSTEM_ROOM;
use crate::services::{
    ActivityService, AnalysisService, AutoCycleService, CameraFeed, GeminiClient, RateLimitService,
    RoomService, TaskScheduler, TelemetryService, VisionService,
};

const EVENT_CAPACITY: usize = 100;

/// Every long-lived service of the node, wired together.
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub sender: Sender<ServiceEvent>,
    pub scheduler: Arc<TaskScheduler>,
    pub room_service: Arc<RoomService>,
    pub activity_service: Arc<ActivityService>,
    pub rate_limit_service: Arc<RateLimitService>,
    pub telemetry_service: Arc<TelemetryService>,
    pub camera_feed: Arc<CameraFeed>,
    pub analysis_service: Arc<AnalysisService>,
    pub auto_cycle_service: Arc<AutoCycleService>,
    pub preference_store: Arc<PreferenceStore>,
}

impl AppContext {
    /// Builds the context around the Gemini client and the random occupancy stand-in.
    pub fn new(settings: &Arc<Settings>) -> Result<Self, VisionError> {
        let vision = Arc::new(GeminiClient::new(&settings.vision)?);
        let detector = Arc::new(RandomDetector::default());

        Ok(Self::with_services(settings, vision, detector))
    }

    pub fn with_services(
        settings: &Arc<Settings>,
        vision: Arc<dyn VisionService>,
        detector: Arc<dyn OccupancyDetector>,
    ) -> Self {
        let (sender, _receiver) = broadcast::channel(EVENT_CAPACITY);
        let schedule = &settings.schedule;

        let scheduler = Arc::new(TaskScheduler::new());
        let room_service = Arc::new(RoomService::new(settings.rooms.clone(), &sender));
        let activity_service = Arc::new(ActivityService::new(&sender));
        let rate_limit_service = Arc::new(RateLimitService::new(
            schedule.cooldown_secs,
            &scheduler,
            &sender,
        ));
        let telemetry_service = Arc::new(TelemetryService::new(&room_service, &sender));
        let camera_feed = Arc::new(CameraFeed::new());
        let analysis_service = Arc::new(AnalysisService::new(
            &room_service,
            &rate_limit_service,
            &activity_service,
            vision,
            detector,
            camera_feed.clone(),
            schedule.fallback_delay(),
        ));
        let auto_cycle_service = Arc::new(AutoCycleService::new(
            schedule.auto_cycle_interval(),
            &room_service,
            &analysis_service,
            &scheduler,
            &sender,
        ));
        let preference_store = Arc::new(PreferenceStore::new(
            settings.preferences.path.clone(),
            settings.preferences.ambient_theme,
        ));

        Self {
            settings: Arc::clone(settings),
            sender,
            scheduler,
            room_service,
            activity_service,
            rate_limit_service,
            telemetry_service,
            camera_feed,
            analysis_service,
            auto_cycle_service,
            preference_store,
        }
    }

    /// Seeds the energy chart, starts the telemetry sampler and announces the node.
    pub async fn start(&self) {
        if self.settings.telemetry.seed_history {
            self.telemetry_service.seed_history().await;
        }
        self.telemetry_service
            .start(&self.scheduler, self.settings.schedule.telemetry_interval());

        self.activity_service
            .push(SYSTEM_ROOM, "EcoSense Grid Node Connected", Severity::Success)
            .await;
    }

    pub fn shutdown(&self) {
        self.scheduler.cancel_all();
    }
}

pub fn create_app(context: &AppContext) -> Router {
    let rooms = room_router(RoomState {
        room_service: context.room_service.clone(),
        analysis_service: context.analysis_service.clone(),
    });

    let control = control_router(ControlState {
        room_service: context.room_service.clone(),
        rate_limit_service: context.rate_limit_service.clone(),
        auto_cycle_service: context.auto_cycle_service.clone(),
    });

    let telemetry = telemetry_router(TelemetryState {
        telemetry_service: context.telemetry_service.clone(),
        activity_service: context.activity_service.clone(),
    });

    let preferences = preference_router(PreferenceState {
        preference_store: context.preference_store.clone(),
    });

    let camera = camera_router(CameraState {
        camera_feed: context.camera_feed.clone(),
    });

    let sse = Router::new()
        .route("/", get(sse_handler))
        .with_state(SSEState {
            sender: context.sender.clone(),
        });

    Router::new()
        .merge(rooms)
        .merge(control)
        .merge(telemetry)
        .merge(preferences)
        .merge(camera)
        .nest("/event", sse)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
