//! Edit the proposal of a draft through a [`DraftSession`].

use chrono::{DateTime, Utc};
use pms_core::entities::{HierarchyNode, TargetRecord};
use pms_core::path::FieldPath;
use pms_core::schema::parse_field_input;
use pms_core::session::{DraftSession, MergeOutcome};
use pms_core::snapshot::capture_snapshot;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProposeArgs;
use crate::commands::shared::input::read_json_file;
use crate::commands::shared::parse::parse_assignment;
use crate::context::AppContext;
use crate::output::output;

/// Parsed edits, applied in field order.
#[derive(Debug, Default)]
struct ProposalEdits {
    target: Option<TargetRecord>,
    clear: bool,
    unset: Vec<FieldPath>,
    set: Vec<(FieldPath, String)>,
    clear_move: bool,
    move_to: Option<HierarchyNode>,
}

impl ProposalEdits {
    fn from_args(args: &ProposeArgs) -> anyhow::Result<Self> {
        let target = args.target.as_deref().map(read_json_file).transpose()?;
        let move_to = args.move_to.as_deref().map(read_json_file).transpose()?;
        let unset = args
            .unset
            .iter()
            .map(|raw| raw.trim().parse::<FieldPath>())
            .collect::<Result<Vec<_>, _>>()?;
        let set = args
            .set
            .iter()
            .map(|raw| parse_assignment(raw).map(|(path, value)| (path, value.to_string())))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            target,
            clear: args.clear,
            unset,
            set,
            clear_move: args.clear_move,
            move_to,
        })
    }

    fn apply(self, session: &mut DraftSession, now: DateTime<Utc>) -> anyhow::Result<()> {
        if let Some(record) = &self.target {
            session.select_target(capture_snapshot(record, now))?;
        }
        if self.clear {
            session.clear_proposed()?;
        }
        for path in self.unset {
            session.toggle_field(path, false)?;
        }
        if !self.set.is_empty() {
            let target_type = session.request().target_type.ok_or_else(|| {
                anyhow::anyhow!("no target selected: pass --target <record.json> first")
            })?;
            for (path, raw) in self.set {
                let value = parse_field_input(target_type, &path, &raw)?;
                session.toggle_field(path.clone(), true)?;
                session.set_field_value(path, value)?;
            }
        }
        if self.clear_move {
            session.clear_move()?;
        }
        if let Some(parent) = &self.move_to {
            session.propose_move(parent)?;
        }
        Ok(())
    }
}

pub async fn run(args: &ProposeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let edits = ProposalEdits::from_args(args)?;

    let request = ctx.service.get_change_request(&args.id).await?;
    let mut session = DraftSession::new(request);
    edits.apply(&mut session, Utc::now())?;

    if !session.is_dirty() {
        return output(session.request(), flags.format);
    }

    let ticket = session.begin_save()?;
    match ctx
        .service
        .update_change_request(&args.id, ticket.patch(), actor)
        .await
    {
        Ok(saved) => {
            let outcome = session.confirm_save(&ticket, saved);
            if outcome != MergeOutcome::Adopted {
                tracing::warn!(id = %args.id, ?outcome, "saved proposal was not adopted");
            }
        }
        Err(error) => {
            session.fail_save(&ticket);
            return Err(error.into());
        }
    }

    output(session.request(), flags.format)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pms_core::entities::{ComponentRecord, HierarchyNode, TargetRecord};
    use pms_core::enums::Category;
    use pms_core::lifecycle::NewChangeRequest;
    use pms_core::path::FieldPath;
    use pms_core::session::DraftSession;
    use pms_core::value::FieldValue;
    use pretty_assertions::assert_eq;

    use super::ProposalEdits;

    fn draft() -> DraftSession {
        let new = NewChangeRequest::new("V-001", Category::Components, "Main engine maker");
        let request = pms_core::entities::ChangeRequest::create("cr-1", new, "u-chief", Utc::now())
            .expect("draft should create");
        DraftSession::new(request)
    }

    fn engine() -> TargetRecord {
        TargetRecord::Component(ComponentRecord {
            id: "c-601".into(),
            component_code: "601.001".into(),
            name: "Main Engine".into(),
            path: vec!["Propulsion".into()],
            maker: Some("MAN B&W".into()),
            running_hours: Some(12_000),
            ..ComponentRecord::default()
        })
    }

    #[test]
    fn set_without_target_is_refused() {
        let mut session = draft();
        let edits = ProposalEdits {
            set: vec![(FieldPath::field("maker"), "Wartsila".into())],
            ..ProposalEdits::default()
        };
        let err = edits.apply(&mut session, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("no target selected"));
    }

    #[test]
    fn target_and_values_build_typed_changes() {
        let mut session = draft();
        let edits = ProposalEdits {
            target: Some(engine()),
            set: vec![
                (FieldPath::field("maker"), "Wartsila".into()),
                (FieldPath::field("runningHours"), "12500".into()),
            ],
            ..ProposalEdits::default()
        };
        edits.apply(&mut session, Utc::now()).expect("edits should apply");

        let changes = session.review_changes();
        assert_eq!(changes.len(), 2);
        let maker = changes
            .iter()
            .find(|c| c.path == FieldPath::field("maker"))
            .expect("maker change");
        assert_eq!(maker.before, Some(FieldValue::Text("MAN B&W".into())));
        assert_eq!(maker.after, FieldValue::Text("Wartsila".into()));
        let hours = changes
            .iter()
            .find(|c| c.path == FieldPath::field("runningHours"))
            .expect("hours change");
        assert_eq!(hours.after, FieldValue::Number(12500.0));
        assert!(session.is_dirty());
    }

    #[test]
    fn unset_drops_a_change_and_move_is_previewed() {
        let mut session = draft();
        ProposalEdits {
            target: Some(engine()),
            set: vec![(FieldPath::field("maker"), "Wartsila".into())],
            ..ProposalEdits::default()
        }
        .apply(&mut session, Utc::now())
        .expect("first edit");

        ProposalEdits {
            unset: vec![FieldPath::field("maker")],
            move_to: Some(HierarchyNode {
                code: "602".into(),
                name: "Auxiliary".into(),
                path: vec![],
                child_count: 3,
            }),
            ..ProposalEdits::default()
        }
        .apply(&mut session, Utc::now())
        .expect("second edit");

        assert!(session.review_changes().is_empty());
        let preview = session.proposal().move_preview().expect("move preview");
        assert_eq!(preview.new_code_preview, "602.4");
        assert_eq!(preview.old_path, "Propulsion > Main Engine");
    }

    #[test]
    fn invalid_number_input_is_reported() {
        let mut session = draft();
        let edits = ProposalEdits {
            target: Some(engine()),
            set: vec![(FieldPath::field("runningHours"), "lots".into())],
            ..ProposalEdits::default()
        };
        assert!(edits.apply(&mut session, Utc::now()).is_err());
    }
}
