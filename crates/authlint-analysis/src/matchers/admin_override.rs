//! Admin-role shortcuts must not bypass resource ownership on data routes.

use std::sync::Arc;

use super::{issue_ids, layer2_error, AuthMatcher};
use crate::extractor::CallSite;
use crate::report::AuthIssue;
use crate::routes::RouteHandler;
use crate::vocabulary::CallRole;

/// One error per admin check, unless the call carries an exception comment.
/// Annotated calls are dropped entirely, not downgraded.
pub struct AdminOverrideMatcher;

impl AuthMatcher for AdminOverrideMatcher {
    fn id(&self) -> &'static str {
        "admin_override"
    }

    fn check(&self, route: &Arc<RouteHandler>, call_sites: &[CallSite]) -> Vec<AuthIssue> {
        call_sites
            .iter()
            .filter(|c| c.role == CallRole::AdminCheck)
            .filter(|c| {
                if c.has_exception_annotation {
                    tracing::trace!(
                        callee = %c.callee_name,
                        line = c.line_number,
                        "admin check exempted by annotation"
                    );
                }
                !c.has_exception_annotation
            })
            .map(|c| {
                layer2_error(
                    issue_ids::ADMIN_ROLE_OVERRIDE,
                    route,
                    c.line_number,
                    format!(
                        "`{}` grants an admin-role override on resource route {}",
                        c.callee_name,
                        route.label()
                    ),
                )
            })
            .collect()
    }
}
