//! Field diff engine.
//!
//! Stateless: reduces toggled fields and candidate values into the list of
//! changes a request proposes.

use std::collections::HashMap;

use crate::entities::{Change, Snapshot};
use crate::path::FieldPath;
use crate::schema::label_for;
use crate::value::FieldValue;

/// Build the change list for `toggled` paths against `snapshot`.
///
/// Output follows the order of `toggled`. A toggled path without a candidate
/// value is skipped. The baseline is the snapshot value at the path's leaf
/// key, or `None` if the snapshot has no such field; a change is emitted only
/// when the candidate differs from that baseline under strict equality.
#[must_use]
pub fn build_changes(
    snapshot: &Snapshot,
    toggled: &[FieldPath],
    values: &HashMap<FieldPath, FieldValue>,
) -> Vec<Change> {
    toggled
        .iter()
        .filter_map(|path| {
            let after = values.get(path)?;
            let before = snapshot.value(path.leaf());
            if before == Some(after) {
                return None;
            }
            Some(Change {
                path: path.clone(),
                label: label_for(snapshot.target_type, path),
                before: before.cloned(),
                after: after.clone(),
            })
        })
        .collect()
}
