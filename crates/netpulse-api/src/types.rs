//! Wire types for the monitoring backend's JSON surface.

use serde::{Deserialize, Serialize};

/// One point-in-time CPU/memory/disk reading with timestamp.
///
/// `/api/system` returns `timestamp`; the system-report rows inside
/// `/api/recent-logs` carry the same reading under a `created_at` column,
/// hence the alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSample {
    pub cpu_percent: f64,
    pub memory: f64,
    pub disk: f64,
    #[serde(alias = "created_at", default)]
    pub timestamp: String,
}

/// A single device discovered by the backend's network scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDevice {
    pub ip: String,
    pub status: String,
}

/// Response shape of `/api/scan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub devices: Vec<ScanDevice>,
    /// The scanning host's own address, as reported by the backend.
    #[serde(default)]
    pub local_ip: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response shape of `/api/ai-advisor`.
///
/// The backend returns either a single multi-line `advice_text` blob
/// or a pre-split `advice` list, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceResponse {
    #[serde(default)]
    pub advice_text: Option<String>,
    #[serde(default)]
    pub advice: Option<Vec<String>>,
}

/// The `details` field of a scan log entry is either plain text or an
/// arbitrary structured value. Rendering layers stringify
/// [`Structured`](LogDetails::Structured) payloads only at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogDetails {
    Text(String),
    Structured(serde_json::Value),
}

impl LogDetails {
    /// Display form: text verbatim, structured values as their JSON text.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Structured(v) => v.to_string(),
        }
    }
}

/// One historical scan record from `/api/recent-logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanLogEntry {
    pub ip: String,
    pub details: LogDetails,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response shape of `/api/recent-logs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentLogs {
    #[serde(default)]
    pub scans: Vec<ScanLogEntry>,
    #[serde(default)]
    pub system_reports: Vec<SystemSample>,
}
