use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Firing,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Firing => "firing",
            AlertStatus::Resolved => "resolved",
        }
    }

    /// Maps a source-side status string. Unknown values return None so the
    /// caller can apply its own default.
    pub fn from_source(s: &str) -> Option<Self> {
        match s {
            "firing" => Some(AlertStatus::Firing),
            "resolved" => Some(AlertStatus::Resolved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
    Low,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Critical => "critical",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Info => "info",
            AlertSeverity::Low => "low",
        }
    }

    pub fn from_source(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(AlertSeverity::Critical),
            "warning" => Some(AlertSeverity::Warning),
            "info" => Some(AlertSeverity::Info),
            "low" => Some(AlertSeverity::Low),
            _ => None,
        }
    }
}

/// Normalized alert record handed to the downstream alerting platform.
///
/// `labels` and `annotations` carry lower-cased keys with the consumed keys
/// removed; `payload` keeps the original sub-event verbatim. `service`,
/// `message` and `url` are the promotable passthrough fields: leftover
/// top-level keys (and labels) with one of these names are lifted onto the
/// record when the field is not already set. Everything else survives only
/// inside `payload`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlertDto {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: AlertStatus,
    pub severity: AlertSeverity,
    #[serde(rename = "lastReceived")]
    pub last_received: DateTime<Utc>,
    pub environment: String,
    pub source: Vec<String>,
    pub labels: HashMap<String, Value>,
    pub annotations: HashMap<String, Value>,
    pub fingerprint: Option<String>,
    pub payload: Value,
    pub service: Option<String>,
    pub message: Option<String>,
    pub url: Option<String>,
}
