use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Read and decode a JSON file given on the command line.
pub fn read_json_file<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let path = Path::new(path);
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}
