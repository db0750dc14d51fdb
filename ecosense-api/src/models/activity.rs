use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Entry identifier
    pub id: Uuid,
    /// Wall clock label, `HH:MM:SS`
    pub time: String,
    /// Room name, or `System`
    pub room: String,
    /// Human readable message
    pub message: String,
    /// Entry severity
    pub severity: Severity,
}
