//! Disk lens: the page-side view of an external disk scanner.
//!
//! Scanning and deletion live in a separate backend process. This module only
//! describes the contract with that backend ([`DiskBackend`], [`ScanEvent`])
//! and the state the page keeps while rendering its event stream
//! ([`DiskLensSession`]).

mod session;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::base64_tool::{scale_binary, trim_decimals};

pub use session::{DiskLensConfig, DiskLensSession, SelectionState};

const DISK_SIZE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

#[derive(Debug, Error)]
pub enum DiskError {
    #[error("{0}")]
    Backend(String),

    #[error("invalid scan event: {0}")]
    Event(#[from] serde_json::Error),
}

/// One entry discovered under the scanned folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanItem {
    pub path: String,
    pub name: String,
    pub size: u64,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanComplete {
    pub path: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Events the backend emits during a scan: any number of items, then exactly
/// one completion for the scanned path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ScanEvent {
    ItemDiscovered(ScanItem),
    ScanComplete(ScanComplete),
}

/// Commands the page sends to the scanner backend.
///
/// `scan` only starts the work; results come back as [`ScanEvent`]s that the
/// host forwards to [`DiskLensSession::handle_event`].
pub trait DiskBackend {
    fn list_available_roots(&self) -> Result<Vec<String>, DiskError>;

    fn scan(&mut self, path: &str) -> Result<(), DiskError>;

    /// Returns the subset of `paths` that was actually removed.
    fn delete(&mut self, paths: &[String]) -> Result<Vec<String>, DiskError>;

    /// Best effort; the backend may still emit events for the running scan.
    fn cancel_scan(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Stable sort by size.
pub fn sort_items(items: &[ScanItem], order: SortOrder) -> Vec<ScanItem> {
    let mut sorted = items.to_vec();
    match order {
        SortOrder::Asc => sorted.sort_by(|a, b| a.size.cmp(&b.size)),
        SortOrder::Desc => sorted.sort_by(|a, b| b.size.cmp(&a.size)),
    }
    sorted
}

pub fn format_size(bytes: i64) -> String {
    if bytes < 0 {
        return "N/A".into();
    }
    if bytes == 0 {
        return "0 Bytes".into();
    }
    let (scaled, unit) = scale_binary(bytes as f64, DISK_SIZE_UNITS.len());
    format!("{} {}", trim_decimals(scaled), DISK_SIZE_UNITS[unit])
}
