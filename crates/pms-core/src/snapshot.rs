//! Snapshot capture.
//!
//! A pure projection of a target record through its type's field schema.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::entities::{Snapshot, TargetRecord};
use crate::schema::field_schema;

/// Capture the fields of `record` that its target type exposes for editing.
///
/// Values the record does not hold are left out, so a later proposal for such
/// a field diffs against "no value". Calling this twice on the same record
/// state with the same timestamp yields equal snapshots.
#[must_use]
pub fn capture_snapshot(record: &TargetRecord, captured_at: DateTime<Utc>) -> Snapshot {
    let fields: BTreeMap<_, _> = field_schema(record.target_type())
        .iter()
        .filter_map(|spec| {
            record
                .field(&spec.path())
                .map(|value| (spec.key.to_string(), value))
        })
        .collect();

    Snapshot {
        target_type: record.target_type(),
        target_id: record.target_id().to_string(),
        display_key: record.display_key().to_string(),
        display_name: record.display_name().to_string(),
        display_path: record.display_path(),
        captured_at,
        fields,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entities::{ClassificationData, ComponentRecord, StoreRecord, WorkOrderRecord};
    use crate::enums::TargetType;
    use crate::value::FieldValue;

    fn main_engine() -> TargetRecord {
        TargetRecord::Component(ComponentRecord {
            id: "cmp-001".into(),
            component_code: "601.001".into(),
            name: "Main Engine".into(),
            path: vec!["Engine Room".into(), "Propulsion".into()],
            maker: Some("MAN B&W".into()),
            model: Some("6S60MC-C".into()),
            commissioned_date: NaiveDate::from_ymd_opt(2019, 3, 1),
            critical: true,
            running_hours: Some(12_500),
            classification_data: Some(ClassificationData {
                certificate_no: Some("CERT-2020-001".into()),
                ..ClassificationData::default()
            }),
            ..ComponentRecord::default()
        })
    }

    #[test]
    fn projects_component_fields() {
        let snap = capture_snapshot(&main_engine(), Utc::now());

        assert_eq!(snap.target_type, TargetType::Component);
        assert_eq!(snap.target_id, "cmp-001");
        assert_eq!(snap.display_key, "601.001");
        assert_eq!(snap.display_name, "Main Engine");
        assert_eq!(snap.display_path, "Engine Room > Propulsion > Main Engine");
        assert_eq!(snap.value("maker"), Some(&FieldValue::Text("MAN B&W".into())));
        assert_eq!(snap.value("runningHours"), Some(&FieldValue::Number(12_500.0)));
        assert_eq!(snap.value("critical"), Some(&FieldValue::Bool(true)));
        assert_eq!(snap.value("classItem"), Some(&FieldValue::Bool(false)));
        assert_eq!(
            snap.value("commissionedDate"),
            Some(&FieldValue::Text("2019-03-01".into()))
        );
        assert_eq!(
            snap.value("certificateNo"),
            Some(&FieldValue::Text("CERT-2020-001".into()))
        );
    }

    #[test]
    fn absent_values_are_omitted() {
        let snap = capture_snapshot(&main_engine(), Utc::now());
        assert!(snap.value("serialNo").is_none());
        assert!(snap.value("classNotation").is_none());
        assert!(snap.value("metric").is_none());
    }

    #[test]
    fn capture_is_idempotent() {
        let record = main_engine();
        let at = Utc::now();
        assert_eq!(capture_snapshot(&record, at), capture_snapshot(&record, at));
    }

    #[test]
    fn work_order_displays_component_path() {
        let record = TargetRecord::WorkOrder(WorkOrderRecord {
            id: "wo-17".into(),
            work_order_no: "WO-601-017".into(),
            component_path: vec!["Engine Room".into(), "Main Engine".into()],
            job_title: "Overhaul fuel injectors".into(),
            frequency_value: Some(4000),
            frequency_unit: Some("hours".into()),
            ..WorkOrderRecord::default()
        });
        let snap = capture_snapshot(&record, Utc::now());
        assert_eq!(snap.display_key, "WO-601-017");
        assert_eq!(snap.display_path, "Engine Room > Main Engine");
        assert_eq!(snap.value("frequencyValue"), Some(&FieldValue::Number(4000.0)));
        assert_eq!(
            snap.fields.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["critical", "frequencyUnit", "frequencyValue", "jobTitle"]
        );
    }

    #[test]
    fn store_includes_item_name() {
        let record = TargetRecord::Store(StoreRecord {
            id: "st-3".into(),
            item_code: "ST-0003".into(),
            item_name: "Cotton rags".into(),
            uom: Some("kg".into()),
            min: Some(0),
            location: Some("Bosun store".into()),
            ..StoreRecord::default()
        });
        let snap = capture_snapshot(&record, Utc::now());
        assert_eq!(snap.value("itemName"), Some(&FieldValue::Text("Cotton rags".into())));
        assert_eq!(snap.value("min"), Some(&FieldValue::Number(0.0)));
        assert_eq!(snap.display_path, "Bosun store");
    }
}
