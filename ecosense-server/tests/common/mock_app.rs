use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use ecosense_analyser::{Detection, OccupancyDetector};
use ecosense_api::models::{AnalysisResult, Switch};
use ecosense_server::app::{AppContext, create_app};
use ecosense_server::configs::{DEFAULT_SETTINGS, Settings};
use ecosense_server::errors::VisionError;
use ecosense_server::services::{VisionRequest, VisionService};
use tempfile::TempDir;

/// Scripted reply of the mock vision service.
#[derive(Debug, Clone)]
pub enum Reply {
    Result(AnalysisResult),
    QuotaExceeded,
    Failure,
}

pub struct MockVision {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    delay: Option<Duration>,
    calls: AtomicU32,
    requests: Mutex<Vec<VisionRequest>>,
}

impl MockVision {
    pub fn new(fallback: Reply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<VisionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl VisionService for MockVision {
    async fn analyze(&self, request: VisionRequest) -> Result<AnalysisResult, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Result(result) => Ok(result),
            Reply::QuotaExceeded => Err(VisionError::QuotaExceeded(
                "429 RESOURCE_EXHAUSTED".to_string(),
            )),
            Reply::Failure => Err(VisionError::Status {
                status: 500,
                message: "internal".to_string(),
            }),
        }
    }
}

pub struct FixedDetector(pub Detection);

impl OccupancyDetector for FixedDetector {
    fn detect(&self) -> Detection {
        self.0
    }
}

pub fn occupied_result(person_count: u32) -> AnalysisResult {
    AnalysisResult {
        occupied: true,
        person_count,
        light_recommendation: Switch::On,
        fan_recommendation: Switch::On,
        fan_speed: 4,
        ac_recommendation: Switch::Off,
        target_temp: 23.0,
    }
}

pub fn vacant_result() -> AnalysisResult {
    AnalysisResult {
        occupied: false,
        person_count: 0,
        light_recommendation: Switch::Off,
        fan_recommendation: Switch::Off,
        fan_speed: 0,
        ac_recommendation: Switch::Off,
        target_temp: 23.0,
    }
}

const TEST_ROOMS: &str = r#"
[telemetry]
seed_history = false

[[rooms]]
id = "lab"
name = "Robotics Lab"
temperature = 27.0
brightness = 40.0
image_url = "https://images.example.com/lab.jpg"
devices = [
    { id = "lab-l1", name = "Lab Lights", type = "LIGHT", is_on = false, power_watts = 200 },
    { id = "lab-f1", name = "Lab Fan", type = "FAN", is_on = false, power_watts = 75, speed = 0 },
    { id = "lab-ac1", name = "Lab AC", type = "AC", is_on = false, power_watts = 1500 },
]

[[rooms]]
id = "office"
name = "Faculty Office"
occupied = true
occupancy_count = 3
temperature = 22.0
brightness = 70.0
image_url = "https://images.example.com/office.jpg"
devices = [
    { id = "office-l1", name = "Desk Lights", type = "LIGHT", is_on = true, power_watts = 100 },
    { id = "office-ac1", name = "Office AC", type = "AC", is_on = true, power_watts = 1000 },
]
"#;

pub struct MockApp {
    pub context: AppContext,
    pub router: Router,
    pub vision: Arc<MockVision>,
    _data_dir: TempDir,
}

impl MockApp {
    pub fn new() -> Self {
        Self::with_vision(MockVision::new(Reply::Result(occupied_result(3))), Detection::people(5))
    }

    pub fn with_vision(vision: MockVision, detection: Detection) -> Self {
        let data_dir = TempDir::new().unwrap();
        let overlay = format!(
            "{TEST_ROOMS}\n[preferences]\npath = '{}'\nambient_theme = \"light\"\n",
            data_dir.path().join("preferences.toml").display()
        );
        let settings = Arc::new(Settings::from_sources(DEFAULT_SETTINGS, Some(overlay.as_str())).unwrap());

        let vision = Arc::new(vision);
        let context =
            AppContext::with_services(&settings, vision.clone(), Arc::new(FixedDetector(detection)));
        let router = create_app(&context);

        Self {
            context,
            router,
            vision,
            _data_dir: data_dir,
        }
    }
}
