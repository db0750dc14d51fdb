use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use ecosense_api::models::{EnergySample, Room};
use rand::Rng;
use tokio::sync::RwLock;
use tokio::sync::broadcast::Sender;

use crate::handles::sse_handle::ServiceEvent;
use crate::services::clock;
use crate::services::room_service::RoomService;
use crate::services::task_scheduler::{FirstTick, TaskKind, TaskScheduler};

pub const HISTORY_CAPACITY: usize = 30;

const SEED_SAMPLES: i64 = 20;
const SEED_SPACING_SECS: i64 = 30;

/// Rolling energy history for the dashboard chart.
#[derive(Debug, Default)]
pub struct EnergyHistory {
    samples: VecDeque<EnergySample>,
}

impl EnergyHistory {
    /// Appends `sample` unless it carries the same label as the newest one. Returns whether it
    /// was kept.
    pub fn push(&mut self, sample: EnergySample) -> bool {
        if self
            .samples
            .back()
            .is_some_and(|last| last.timestamp == sample.timestamp)
        {
            return false;
        }

        self.samples.push_back(sample);
        while self.samples.len() > HISTORY_CAPACITY {
            self.samples.pop_front();
        }

        true
    }

    pub fn samples(&self) -> Vec<EnergySample> {
        self.samples.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Watts to kW, rounded to two decimals.
fn to_kw(watts: u32) -> f64 {
    (f64::from(watts) / 10.0).round() / 100.0
}

/// Consumption is everything switched on; savings is what sits switched off in empty rooms.
pub fn measure(rooms: &[Room], timestamp: String) -> EnergySample {
    let consumption: u32 = rooms.iter().map(Room::active_watts).sum();
    let savings: u32 = rooms
        .iter()
        .filter(|room| room.is_empty())
        .map(Room::idle_watts)
        .sum();

    EnergySample {
        timestamp,
        consumption: to_kw(consumption),
        savings: to_kw(savings),
    }
}

pub struct TelemetryService {
    history: Arc<RwLock<EnergyHistory>>,
    rooms: Arc<RoomService>,
    sender: Sender<ServiceEvent>,
}

impl TelemetryService {
    pub fn new(rooms: &Arc<RoomService>, sender: &Sender<ServiceEvent>) -> Self {
        Self {
            history: Arc::new(RwLock::new(EnergyHistory::default())),
            rooms: Arc::clone(rooms),
            sender: sender.clone(),
        }
    }

    /// Back-fills the chart with plausible readings for the last ten minutes.
    pub async fn seed_history(&self) {
        let now = clock::now();
        let mut history = self.history.write().await;
        let mut rng = rand::thread_rng();

        for step in (1..=SEED_SAMPLES).rev() {
            let at = now - time::Duration::seconds(step * SEED_SPACING_SECS);
            history.push(EnergySample {
                timestamp: clock::time_label(at),
                consumption: round2(rng.gen_range(2.0..3.5)),
                savings: round2(rng.gen_range(0.1..0.5)),
            });
        }

        tracing::debug!("seeded {} energy samples", history.len());
    }

    /// Samples the current draw under `timestamp`. Returns the sample if it was kept.
    pub async fn record(&self, timestamp: String) -> Option<EnergySample> {
        let sample = measure(&self.rooms.list().await, timestamp);

        if !self.history.write().await.push(sample.clone()) {
            return None;
        }

        let _ = self.sender.send(ServiceEvent::Telemetry(sample.clone()));
        Some(sample)
    }

    pub async fn samples(&self) -> Vec<EnergySample> {
        self.history.read().await.samples()
    }

    /// Samples once now and then every `period`.
    pub fn start(self: &Arc<Self>, scheduler: &TaskScheduler, period: Duration) {
        let service = Arc::clone(self);

        scheduler.spawn_repeating(TaskKind::Telemetry, period, FirstTick::Immediate, move || {
            let service = Arc::clone(&service);
            async move {
                service.record(clock::time_label(clock::now())).await;
                ControlFlow::Continue(())
            }
        });
    }
}
