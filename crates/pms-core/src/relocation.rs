//! Move preview for re-parenting a component.
//!
//! Nothing here touches the real hierarchy. The computed code is a preview:
//! the slot is not reserved, so an earlier approved move under the same
//! parent can take it. Approvers re-check codes at apply time.

use crate::entities::{HierarchyNode, MovePreview, PATH_SEPARATOR, Snapshot};
use crate::enums::TargetType;
use crate::errors::CoreError;

/// Preview relocating the snapshot's component under `new_parent`.
///
/// # Errors
///
/// Returns `CoreError::InvalidMove` when the target is not a component, or
/// when `new_parent` is the component itself or one of its descendants.
pub fn propose_move(
    snapshot: &Snapshot,
    new_parent: &HierarchyNode,
) -> Result<MovePreview, CoreError> {
    if snapshot.target_type != TargetType::Component {
        return Err(CoreError::InvalidMove(format!(
            "only components can be moved, target is a {}",
            snapshot.target_type
        )));
    }

    let old_code = &snapshot.display_key;
    if new_parent.code == *old_code || new_parent.code.starts_with(&format!("{old_code}.")) {
        return Err(CoreError::InvalidMove(format!(
            "cannot move {old_code} under itself or its descendant {}",
            new_parent.code
        )));
    }

    Ok(MovePreview {
        old_path: snapshot.display_path.clone(),
        new_path: format!(
            "{}{PATH_SEPARATOR}{}",
            new_parent.display_path(),
            snapshot.display_name
        ),
        old_code: old_code.clone(),
        new_code_preview: format!(
            "{}.{}",
            new_parent.code,
            new_parent.child_count.saturating_add(1)
        ),
        new_parent_code: new_parent.code.clone(),
    })
}
