use std::path::Path;

use chrono::{DateTime, Utc};

/// Builds the on-disk name for an upload: an ISO-8601 timestamp with `:`
/// swapped for `-`, a dash, then the base name the client sent.
pub fn stored_file_name(now: DateTime<Utc>, original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("upload");

    format!("{}-{}", now.format("%Y-%m-%dT%H-%M-%S%.3fZ"), base)
}
