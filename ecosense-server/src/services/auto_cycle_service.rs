use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::broadcast::Sender;

use crate::handles::sse_handle::ServiceEvent;
use crate::services::analysis_service::AnalysisService;
use crate::services::room_service::RoomService;
use crate::services::task_scheduler::{FirstTick, TaskKind, TaskScheduler};

/// Walks the live camera across the rooms and analyses each one in turn.
pub struct AutoCycleService {
    enabled: AtomicBool,
    period: Duration,
    rooms: Arc<RoomService>,
    analysis: Arc<AnalysisService>,
    scheduler: Arc<TaskScheduler>,
    sender: Sender<ServiceEvent>,
}

impl AutoCycleService {
    pub fn new(
        period: Duration,
        rooms: &Arc<RoomService>,
        analysis: &Arc<AnalysisService>,
        scheduler: &Arc<TaskScheduler>,
        sender: &Sender<ServiceEvent>,
    ) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            period,
            rooms: Arc::clone(rooms),
            analysis: Arc::clone(analysis),
            scheduler: Arc::clone(scheduler),
            sender: sender.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Enabling starts a fresh cycle right away; disabling stops future steps but leaves a
    /// running analysis alone.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);

        if enabled {
            let rooms = Arc::clone(&self.rooms);
            let analysis = Arc::clone(&self.analysis);

            self.scheduler.spawn_repeating(
                TaskKind::AutoCycle,
                self.period,
                FirstTick::Immediate,
                move || {
                    let rooms = Arc::clone(&rooms);
                    let analysis = Arc::clone(&analysis);
                    async move {
                        if let Some(room) = rooms.advance_camera().await {
                            tracing::debug!("auto cycle moved camera to {}", room.id);
                            tokio::spawn(async move {
                                if let Err(e) = analysis.analyze(&room.id).await {
                                    tracing::warn!("auto cycle analysis failed: {}", e);
                                }
                            });
                        }
                        ControlFlow::Continue(())
                    }
                },
            );
            tracing::info!("auto cycle enabled every {:?}", self.period);
        } else {
            self.scheduler.cancel(TaskKind::AutoCycle);
            tracing::info!("auto cycle disabled");
        }

        let _ = self.sender.send(ServiceEvent::AutoCycle { enabled });
    }
}
