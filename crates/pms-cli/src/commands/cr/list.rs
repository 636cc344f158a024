use pms_client::ListQuery;
use pms_core::entities::ChangeRequestSummary;
use pms_core::enums::{Category, ChangeRequestStatus, TargetType};
use pms_core::responses::ChangeRequestListResponse;
use pms_db::repos::change_request::ChangeRequestFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct ListArgs<'a> {
    pub status: Option<&'a str>,
    pub category: Option<&'a str>,
    pub vessel: Option<&'a str>,
    pub target_type: Option<&'a str>,
    pub target_id: Option<&'a str>,
    pub mine: bool,
    pub search: Option<&'a str>,
    pub limit: Option<u32>,
}

pub async fn run(
    args: &ListArgs<'_>,
    remote: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = build_filter(args, ctx, flags)?;

    let response = if remote {
        let mut page = ctx.client()?.list(&remote_query(&filter)).await?;
        retain_unsupported_remote(&mut page.items, &filter);
        page
    } else {
        let items = ctx.service.list_change_requests(&filter).await?;
        ChangeRequestListResponse {
            total: u32::try_from(items.len())?,
            items,
        }
    };

    output(&response, flags.format)
}

fn build_filter(
    args: &ListArgs<'_>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ChangeRequestFilter> {
    Ok(ChangeRequestFilter {
        vessel_id: args
            .vessel
            .map(str::to_string)
            .or_else(|| Some(ctx.config.general.vessel_id.clone()).filter(|v| !v.is_empty())),
        category: args
            .category
            .map(|value| parse_enum::<Category>(value, "category"))
            .transpose()?,
        status: args
            .status
            .map(|value| parse_enum::<ChangeRequestStatus>(value, "status"))
            .transpose()?,
        target_type: args
            .target_type
            .map(|value| parse_enum::<TargetType>(value, "target type"))
            .transpose()?,
        target_id: args.target_id.map(str::to_string),
        requested_by: if args.mine {
            Some(ctx.actor()?.to_string())
        } else {
            None
        },
        q: args.search.map(str::to_string),
        limit: Some(effective_limit(
            args.limit,
            flags.limit,
            ctx.config.general.default_limit,
        )),
    })
}

fn remote_query(filter: &ChangeRequestFilter) -> ListQuery {
    ListQuery {
        vessel_id: filter.vessel_id.clone(),
        category: filter.category,
        status: filter.status,
        q: filter.q.clone(),
        limit: filter.limit,
    }
}

/// The server only filters by vessel, category, status and text; apply the
/// rest locally.
fn retain_unsupported_remote(items: &mut Vec<ChangeRequestSummary>, filter: &ChangeRequestFilter) {
    items.retain(|item| {
        filter.target_type.is_none_or(|t| item.target_type == Some(t))
            && filter
                .target_id
                .as_deref()
                .is_none_or(|id| item.target_id.as_deref() == Some(id))
            && filter
                .requested_by
                .as_deref()
                .is_none_or(|user| item.requested_by_user_id == user)
    });
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pms_core::entities::ChangeRequestSummary;
    use pms_core::enums::{Category, ChangeRequestStatus, TargetType};
    use pms_db::repos::change_request::ChangeRequestFilter;

    use super::{remote_query, retain_unsupported_remote};

    fn mk(id: &str, target_type: Option<TargetType>, requested_by: &str) -> ChangeRequestSummary {
        ChangeRequestSummary {
            id: id.to_string(),
            vessel_id: "V-001".to_string(),
            category: Category::Components,
            title: format!("request {id}"),
            status: ChangeRequestStatus::Draft,
            target_type,
            target_id: target_type.map(|_| format!("t-{id}")),
            requested_by_user_id: requested_by.to_string(),
            change_count: 0,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn remote_filtering_applies_target_and_requester() {
        let mut items = vec![
            mk("1", Some(TargetType::Component), "u-chief"),
            mk("2", Some(TargetType::Spare), "u-chief"),
            mk("3", Some(TargetType::Component), "u-second"),
            mk("4", None, "u-chief"),
        ];
        let filter = ChangeRequestFilter {
            target_type: Some(TargetType::Component),
            requested_by: Some("u-chief".to_string()),
            ..ChangeRequestFilter::default()
        };
        retain_unsupported_remote(&mut items, &filter);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "1");
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let mut items = vec![mk("1", None, "a"), mk("2", Some(TargetType::Store), "b")];
        retain_unsupported_remote(&mut items, &ChangeRequestFilter::default());
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn remote_query_carries_server_filters() {
        let filter = ChangeRequestFilter {
            vessel_id: Some("V-001".to_string()),
            status: Some(ChangeRequestStatus::Submitted),
            q: Some("pump".to_string()),
            limit: Some(20),
            target_id: Some("c-1".to_string()),
            ..ChangeRequestFilter::default()
        };
        let query = remote_query(&filter);
        assert_eq!(
            query.to_query_string(),
            "?vesselId=V-001&status=submitted&q=pump&limit=20"
        );
    }
}
