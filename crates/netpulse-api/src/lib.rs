// netpulse-api: Async Rust client for the netpulse monitoring backend

pub mod client;
pub mod error;
pub mod types;

pub use client::BackendClient;
pub use error::Error;
pub use types::{
    AdviceResponse, LogDetails, RecentLogs, ScanDevice, ScanLogEntry, ScanResponse, SystemSample,
};
