use pms_core::path::FieldPath;
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Split `path=value` into a field path and the raw value.
pub fn parse_assignment(raw: &str) -> anyhow::Result<(FieldPath, &str)> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected path=value, got '{raw}'"))?;
    Ok((path.trim().parse()?, value))
}
