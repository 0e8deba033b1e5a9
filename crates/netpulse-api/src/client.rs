// Hand-crafted async HTTP client for the monitoring backend.
//
// Four endpoints under /api/, JSON bodies and responses, no auth.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{AdviceResponse, RecentLogs, ScanResponse, SystemSample};

/// Async client for the monitoring backend.
///
/// Cheap to clone (the inner `reqwest::Client` is an `Arc`). The base URL
/// is injected configuration — there is no hardcoded backend address.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Build a client from a base URL and request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("netpulse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn from_reqwest(base_url: Url, http: reqwest::Client) -> Self {
        Self { http, base_url }
    }

    /// Join a relative path (e.g. `"api/system"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// GET `/api/system` — current CPU/memory/disk reading.
    pub async fn get_system(&self) -> Result<SystemSample, Error> {
        self.get("api/system").await
    }

    /// GET `/api/scan` — run a network scan and return discovered devices.
    pub async fn scan(&self) -> Result<ScanResponse, Error> {
        self.get("api/scan").await
    }

    /// POST `/api/ai-advisor` — request advisory text.
    ///
    /// The body is an empty JSON object; the backend derives its context
    /// from its own stored logs.
    pub async fn request_advice(&self) -> Result<AdviceResponse, Error> {
        let url = self.url("api/ai-advisor")?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// GET `/api/recent-logs` — historical scan and system-report records.
    pub async fn recent_logs(&self) -> Result<RecentLogs, Error> {
        self.get("api/recent-logs").await
    }

    // ── HTTP plumbing ────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            let raw = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            })
        }
    }
}
