// ── Core error types ──
//
// User-facing errors from netpulse-core. Consumers never see raw HTTP
// status codes or JSON parse failures directly; the `From<netpulse_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot reach backend: {reason}")]
    BackendUnreachable { reason: String },

    #[error("Backend request failed: {message}")]
    RequestFailed { message: String },

    #[error("Backend returned malformed data: {message}")]
    MalformedData { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<netpulse_api::Error> for CoreError {
    fn from(err: netpulse_api::Error) -> Self {
        match err {
            netpulse_api::Error::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                CoreError::BackendUnreachable {
                    reason: e.to_string(),
                }
            }
            netpulse_api::Error::Transport(e) => CoreError::RequestFailed {
                message: e.to_string(),
            },
            netpulse_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            netpulse_api::Error::Api { status, message } => CoreError::RequestFailed {
                message: format!("HTTP {status}: {message}"),
            },
            netpulse_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedData { message }
            }
        }
    }
}
