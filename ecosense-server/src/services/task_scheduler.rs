use std::collections::HashMap;
use std::future::Future;
use std::ops::ControlFlow;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// The repeating timers of the dashboard. At most one task of each kind runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Telemetry,
    Cooldown,
    AutoCycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstTick {
    Immediate,
    AfterPeriod,
}

/// Owns the handles of every repeating task so that restarting or cancelling one never leaves
/// an orphaned timer behind.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    tasks: Mutex<HashMap<TaskKind, JoinHandle<()>>>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `job` every `period`, replacing (and aborting) any running task of the same kind.
    /// The task ends when `job` returns `ControlFlow::Break`.
    pub fn spawn_repeating<F, Fut>(&self, kind: TaskKind, period: Duration, first_tick: FirstTick, mut job: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let start = match first_tick {
            FirstTick::Immediate => Instant::now(),
            FirstTick::AfterPeriod => Instant::now() + period,
        };

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if job().await.is_break() {
                    break;
                }
            }

            tracing::debug!("{:?} task finished", kind);
        });

        if let Some(previous) = self.lock().insert(kind, handle) {
            previous.abort();
            tracing::debug!("{:?} task restarted", kind);
        }
    }

    /// Aborts the task of the given kind. Returns whether one was still running.
    pub fn cancel(&self, kind: TaskKind) -> bool {
        match self.lock().remove(&kind) {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, handle) in self.lock().drain() {
            handle.abort();
        }
    }

    pub fn is_running(&self, kind: TaskKind) -> bool {
        self.lock()
            .get(&kind)
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TaskKind, JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TaskScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
