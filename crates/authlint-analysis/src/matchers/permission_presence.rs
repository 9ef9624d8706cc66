//! Every data handler needs at least one ownership/permission check.

use std::sync::Arc;

use super::{issue_ids, layer2_error, AuthMatcher};
use crate::extractor::CallSite;
use crate::report::AuthIssue;
use crate::routes::RouteHandler;
use crate::vocabulary::CallRole;

pub struct PermissionPresenceMatcher;

impl AuthMatcher for PermissionPresenceMatcher {
    fn id(&self) -> &'static str {
        "permission_presence"
    }

    fn check(&self, route: &Arc<RouteHandler>, call_sites: &[CallSite]) -> Vec<AuthIssue> {
        if call_sites.iter().any(|c| c.role == CallRole::PermissionCheck) {
            return Vec::new();
        }
        vec![layer2_error(
            issue_ids::MISSING_OWNERSHIP_CHECK,
            route,
            route.start_line,
            format!("{} has no resource permission check", route.label()),
        )]
    }
}
