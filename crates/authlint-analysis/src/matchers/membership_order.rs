//! Organization membership must be established before any permission check.

use std::sync::Arc;

use super::{first_with_role, issue_ids, layer2_error, AuthMatcher};
use crate::extractor::CallSite;
use crate::report::AuthIssue;
use crate::routes::RouteHandler;
use crate::vocabulary::CallRole;

/// Flags a missing membership check, or one that only runs after the first
/// permission check. Ordering compares `sequence_index`, first occurrence wins.
pub struct MembershipOrderMatcher;

impl AuthMatcher for MembershipOrderMatcher {
    fn id(&self) -> &'static str {
        "membership_order"
    }

    fn check(&self, route: &Arc<RouteHandler>, call_sites: &[CallSite]) -> Vec<AuthIssue> {
        let membership = first_with_role(call_sites, CallRole::MembershipCheck);
        let permission = first_with_role(call_sites, CallRole::PermissionCheck);

        match (membership, permission) {
            (None, Some(p)) => vec![layer2_error(
                issue_ids::MISSING_ORG_MEMBERSHIP_CHECK,
                route,
                p.line_number,
                format!(
                    "`{}` checks a permission without a prior organization membership check",
                    p.callee_name
                ),
            )],
            (None, None) => vec![layer2_error(
                issue_ids::MISSING_ORG_MEMBERSHIP_CHECK,
                route,
                route.start_line,
                format!("{} never checks organization membership", route.label()),
            )],
            (Some(m), Some(p)) if m.sequence_index > p.sequence_index => vec![layer2_error(
                issue_ids::MISSING_SCOPE_BEFORE_PERMISSION,
                route,
                p.line_number,
                format!(
                    "`{}` (line {}) runs before membership check `{}` (line {})",
                    p.callee_name, p.line_number, m.callee_name, m.line_number
                ),
            )],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::test_support::*;
    use crate::vocabulary::CallRole::*;

    fn check(calls: &[(&str, CallRole)]) -> Vec<AuthIssue> {
        MembershipOrderMatcher.check(&data_route(), &sites(calls))
    }

    #[test]
    fn scenario_b_permission_without_membership() {
        let issues = check(&[("can_access_chat", PermissionCheck)]);
        assert_eq!(ids(&issues), vec![issue_ids::MISSING_ORG_MEMBERSHIP_CHECK]);
        assert_eq!(issues[0].line_number, 11);
    }

    #[test]
    fn scenario_e_permission_before_membership() {
        let issues = check(&[("can_access_chat", PermissionCheck), ("is_org_member", MembershipCheck)]);
        assert_eq!(ids(&issues), vec![issue_ids::MISSING_SCOPE_BEFORE_PERMISSION]);
    }

    #[test]
    fn order_is_decided_by_sequence_index_not_line() {
        let mut calls = sites(&[("is_org_member", MembershipCheck), ("can_view", PermissionCheck)]);
        calls[0].sequence_index = 3;
        calls[1].sequence_index = 1;
        assert_eq!(
            ids(&MembershipOrderMatcher.check(&data_route(), &calls)),
            vec![issue_ids::MISSING_SCOPE_BEFORE_PERMISSION]
        );

        calls[0].sequence_index = 1;
        calls[1].sequence_index = 3;
        assert!(MembershipOrderMatcher.check(&data_route(), &calls).is_empty());
    }

    #[test]
    fn first_occurrence_wins() {
        let issues = check(&[
            ("is_org_member", MembershipCheck),
            ("can_view", PermissionCheck),
            ("is_org_member", MembershipCheck),
            ("can_edit", PermissionCheck),
        ]);
        assert!(issues.is_empty());
    }

    #[test]
    fn no_calls_anchors_on_definition() {
        let issues = check(&[]);
        assert_eq!(ids(&issues), vec![issue_ids::MISSING_ORG_MEMBERSHIP_CHECK]);
        assert_eq!(issues[0].line_number, 10);
    }

    #[test]
    fn membership_only_is_not_this_matchers_concern() {
        assert!(check(&[("is_org_member", MembershipCheck)]).is_empty());
    }
}
