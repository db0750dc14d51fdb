use std::collections::VecDeque;

use ecosense_api::models::{ActivityLogEntry, Severity};
use tokio::sync::RwLock;
use tokio::sync::broadcast::Sender;
use uuid::Uuid;

use crate::handles::sse_handle::ServiceEvent;
use crate::services::clock;

pub const ACTIVITY_CAPACITY: usize = 10;

/// Newest-first log of notable events, bounded to [`ACTIVITY_CAPACITY`] entries.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityLogEntry>,
}

impl ActivityLog {
    pub fn push(&mut self, entry: ActivityLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(ACTIVITY_CAPACITY);
    }

    pub fn entries(&self) -> Vec<ActivityLogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct ActivityService {
    log: RwLock<ActivityLog>,
    sender: Sender<ServiceEvent>,
}

impl ActivityService {
    pub fn new(sender: &Sender<ServiceEvent>) -> Self {
        Self {
            log: RwLock::new(ActivityLog::default()),
            sender: sender.clone(),
        }
    }

    pub async fn push(&self, room: &str, message: impl Into<String>, severity: Severity) -> ActivityLogEntry {
        let entry = ActivityLogEntry {
            id: Uuid::new_v4(),
            time: clock::time_label(clock::now()),
            room: room.to_string(),
            message: message.into(),
            severity,
        };

        tracing::debug!("activity [{:?}] {}: {}", entry.severity, entry.room, entry.message);

        self.log.write().await.push(entry.clone());
        let _ = self.sender.send(ServiceEvent::Activity(entry.clone()));

        entry
    }

    pub async fn entries(&self) -> Vec<ActivityLogEntry> {
        self.log.read().await.entries()
    }
}
