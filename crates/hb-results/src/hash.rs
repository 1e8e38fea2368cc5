//! Content hashing and timestamps for result provenance.

use chrono::{SecondsFormat, Utc};
use hb_project::PlantGraph;
use sha2::{Digest, Sha256};

use crate::ResultsResult;

/// SHA-256 of the plant's canonical JSON, hex encoded.
///
/// Maps serialize through `serde_json::Value`, whose objects are sorted by
/// key, so equal plants hash equally regardless of document key order.
pub fn plant_hash(plant: &PlantGraph) -> ResultsResult<String> {
    let canonical = serde_json::to_value(plant)?;
    let bytes = serde_json::to_vec(&canonical)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Current UTC time, RFC 3339 with second precision.
pub fn timestamp_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
