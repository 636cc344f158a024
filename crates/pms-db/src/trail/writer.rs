//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to per-vessel `{trail_dir}/{vessel}.jsonl`
//! files. Uses `serde_jsonlines::append_json_lines` for per-line appends.

use std::path::{Path, PathBuf};

use pms_core::trail::TrailOperation;

use crate::error::DatabaseError;

/// Appends trail operations to per-vessel JSONL files.
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a new `TrailWriter` pointing at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// Create a disabled writer.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append a trail operation to the vessel's JSONL file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append(&self, op: &TrailOperation) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.file_for(&op.vessel);
        serde_jsonlines::append_json_lines(&path, [op])
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(())
    }

    /// Read back every operation recorded for `vessel`, oldest first.
    ///
    /// A vessel with no trail file yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file exists but cannot be read or parsed.
    pub fn read_vessel(&self, vessel: &str) -> Result<Vec<TrailOperation>, DatabaseError> {
        let path = self.file_for(vessel);
        if !path.exists() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines(&path)
            .map_err(|e| DatabaseError::Other(e.into()))?
            .collect::<std::io::Result<Vec<TrailOperation>>>()
            .map_err(|e| DatabaseError::Other(e.into()))
    }

    /// The directory where trail files are stored.
    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }

    fn file_for(&self, vessel: &str) -> PathBuf {
        let name: String = vessel
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.trail_dir.join(format!("{name}.jsonl"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pms_core::enums::{EntityType, TrailOp};
    use tempfile::TempDir;

    fn op(vessel: &str, id: &str) -> TrailOperation {
        TrailOperation {
            v: 1,
            ts: "2026-02-08T12:00:00Z".into(),
            vessel: vessel.into(),
            actor: "usr-1".into(),
            op: TrailOp::Create,
            entity: EntityType::ChangeRequest,
            id: id.into(),
            data: serde_json::json!({}),
        }
    }

    #[test]
    fn appends_per_vessel_files() {
        let dir = TempDir::new().unwrap();
        let writer = TrailWriter::new(dir.path().join("trail")).unwrap();

        writer.append(&op("vsl-1", "cr-1")).unwrap();
        writer.append(&op("vsl-1", "cr-2")).unwrap();
        writer.append(&op("vsl-2", "cr-3")).unwrap();

        let first = writer.read_vessel("vsl-1").unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].id, "cr-2");
        assert_eq!(writer.read_vessel("vsl-2").unwrap().len(), 1);
        assert!(writer.read_vessel("vsl-3").unwrap().is_empty());
    }

    #[test]
    fn disabled_writer_is_noop() {
        let writer = TrailWriter::disabled();
        assert!(!writer.is_enabled());
        writer.append(&op("vsl-1", "cr-1")).unwrap();
    }

    #[test]
    fn vessel_names_cannot_escape_trail_dir() {
        let dir = TempDir::new().unwrap();
        let writer = TrailWriter::new(dir.path().to_path_buf()).unwrap();
        writer.append(&op("../outside", "cr-1")).unwrap();
        assert!(dir.path().join("___outside.jsonl").exists());
    }
}
