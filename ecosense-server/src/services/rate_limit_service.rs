use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use ecosense_api::models::RateLimitState;
use tokio::sync::RwLock;
use tokio::sync::broadcast::Sender;

use crate::handles::sse_handle::ServiceEvent;
use crate::services::task_scheduler::{FirstTick, TaskKind, TaskScheduler};

#[derive(Debug, Default)]
struct Cooldown {
    state: RateLimitState,
    // Bumped on every trip so a countdown that outlived its restart cannot tick the new one.
    generation: u64,
}

/// Tracks whether the remote vision service is throttling us and counts the cooldown down.
pub struct RateLimitService {
    cooldown: Arc<RwLock<Cooldown>>,
    cooldown_secs: u32,
    scheduler: Arc<TaskScheduler>,
    sender: Sender<ServiceEvent>,
}

impl RateLimitService {
    pub fn new(cooldown_secs: u32, scheduler: &Arc<TaskScheduler>, sender: &Sender<ServiceEvent>) -> Self {
        Self {
            cooldown: Arc::new(RwLock::new(Cooldown::default())),
            cooldown_secs,
            scheduler: Arc::clone(scheduler),
            sender: sender.clone(),
        }
    }

    pub async fn is_throttled(&self) -> bool {
        self.cooldown.read().await.state.throttled
    }

    pub async fn snapshot(&self) -> RateLimitState {
        self.cooldown.read().await.state
    }

    /// Enters the throttled state, restarting the countdown if one is already running.
    pub async fn trip(&self) {
        let (state, generation) = {
            let mut cooldown = self.cooldown.write().await;
            cooldown.generation += 1;
            cooldown.state.trip(self.cooldown_secs);
            (cooldown.state, cooldown.generation)
        };

        tracing::warn!("vision service throttled, local override for {}s", state.cooldown_seconds);
        let _ = self.sender.send(ServiceEvent::RateLimit(state));

        if !state.throttled {
            self.scheduler.cancel(TaskKind::Cooldown);
            return;
        }

        let cooldown = Arc::clone(&self.cooldown);
        let sender = self.sender.clone();
        self.scheduler.spawn_repeating(
            TaskKind::Cooldown,
            Duration::from_secs(1),
            FirstTick::AfterPeriod,
            move || {
                let cooldown = Arc::clone(&cooldown);
                let sender = sender.clone();
                async move {
                    let state = {
                        let mut cooldown = cooldown.write().await;
                        if cooldown.generation != generation {
                            return ControlFlow::Break(());
                        }
                        cooldown.state.tick();
                        cooldown.state
                    };

                    let _ = sender.send(ServiceEvent::RateLimit(state));

                    if state.throttled {
                        ControlFlow::Continue(())
                    } else {
                        tracing::info!("vision service cooldown elapsed, back to nominal");
                        ControlFlow::Break(())
                    }
                }
            },
        );
    }
}
