//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session of port interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Cassette name, usually `<timestamp>-<port>`.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Interactions in recording order.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One call through a port and its result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Sequence number across the whole cassette.
    pub seq: u64,
    /// Port name, e.g. `image_generator`.
    pub port: String,
    /// Method name, e.g. `generate`.
    pub method: String,
    /// Serialized request.
    pub input: serde_json::Value,
    /// `{"Ok": ...}` or `{"Err": "..."}`.
    pub output: serde_json::Value,
}
