//! Shared test utilities for pms-db unit tests.

pub(crate) mod helpers {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use pms_core::entities::{Change, ChangeRequest, Snapshot};
    use pms_core::enums::{Category, TargetType};
    use pms_core::lifecycle::{ChangeRequestPatch, ChangeRequestPatchBuilder, NewChangeRequest};
    use pms_core::path::FieldPath;
    use pms_core::value::FieldValue;

    use crate::PmsDb;
    use crate::service::PmsService;
    use crate::trail::writer::TrailWriter;

    /// In-memory service with trail disabled.
    pub async fn test_service() -> PmsService {
        let db = PmsDb::open_local(":memory:").await.unwrap();
        PmsService::from_db(db, TrailWriter::disabled())
    }

    /// In-memory service with trail files written to `trail_dir`.
    pub async fn test_service_with_trail(trail_dir: std::path::PathBuf) -> PmsService {
        let db = PmsDb::open_local(":memory:").await.unwrap();
        PmsService::from_db(db, TrailWriter::new(trail_dir).unwrap())
    }

    pub fn engine_snapshot() -> Snapshot {
        let mut fields = BTreeMap::new();
        fields.insert("maker".to_string(), FieldValue::from("MAN B&W"));
        fields.insert("model".to_string(), FieldValue::from("6S60MC-C"));
        Snapshot {
            target_type: TargetType::Component,
            target_id: "cmp-001".into(),
            display_key: "601.001".into(),
            display_name: "Main Engine".into(),
            display_path: "Engine Room > Main Engine".into(),
            captured_at: Utc::now(),
            fields,
        }
    }

    /// Patch that makes a draft submittable.
    pub fn complete_patch() -> ChangeRequestPatch {
        ChangeRequestPatchBuilder::new()
            .reason(Some("Maker plate replaced during dry dock".into()))
            .target(engine_snapshot())
            .proposed_changes(vec![Change {
                path: FieldPath::field("maker"),
                label: "Maker".into(),
                before: Some("MAN B&W".into()),
                after: "Wartsila".into(),
            }])
            .build()
    }

    pub async fn draft(svc: &PmsService, title: &str) -> ChangeRequest {
        let new = NewChangeRequest::new("vsl-001", Category::Components, title);
        svc.create_change_request(new, "usr-chief").await.unwrap()
    }

    pub async fn submitted(svc: &PmsService) -> ChangeRequest {
        let request = draft(svc, "Correct engine maker").await;
        svc.update_change_request(&request.id, complete_patch(), "usr-chief")
            .await
            .unwrap();
        svc.submit_change_request(&request.id, "usr-chief")
            .await
            .unwrap()
    }
}
