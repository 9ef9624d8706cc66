//! Layer-2 resource-authorization matchers.
//!
//! Each matcher inspects one `data` handler's call sequence independently.
//! `Layer2Suite` refuses to run on any other category.

pub mod admin_override;
pub mod membership_order;
pub mod permission_presence;

use std::sync::Arc;

pub use admin_override::AdminOverrideMatcher;
pub use membership_order::MembershipOrderMatcher;
pub use permission_presence::PermissionPresenceMatcher;

use crate::extractor::CallSite;
use crate::report::{AuthIssue, Layer, Severity};
use crate::routes::{RouteCategory, RouteHandler};
use crate::vocabulary::CallRole;

/// Stable issue identifiers.
pub mod issue_ids {
    pub const MISSING_ORG_MEMBERSHIP_CHECK: &str = "auth_resource_missing_org_membership_check";
    pub const MISSING_SCOPE_BEFORE_PERMISSION: &str =
        "auth_resource_missing_scope_before_permission";
    pub const MISSING_OWNERSHIP_CHECK: &str = "auth_resource_missing_ownership_check";
    pub const ADMIN_ROLE_OVERRIDE: &str = "auth_resource_admin_role_override";
}

/// A single resource-authorization check.
pub trait AuthMatcher: Send + Sync {
    /// Short identifier for logs.
    fn id(&self) -> &'static str;

    /// Issues for one `data` handler.
    fn check(&self, route: &Arc<RouteHandler>, call_sites: &[CallSite]) -> Vec<AuthIssue>;
}

/// The three Layer-2 matchers, run in a fixed order.
pub struct Layer2Suite {
    matchers: Vec<Box<dyn AuthMatcher>>,
}

impl Layer2Suite {
    pub fn new() -> Self {
        Self {
            matchers: vec![
                Box::new(MembershipOrderMatcher),
                Box::new(PermissionPresenceMatcher),
                Box::new(AdminOverrideMatcher),
            ],
        }
    }

    /// Run every matcher. Returns nothing for non-`data` handlers.
    pub fn check(&self, route: &Arc<RouteHandler>, call_sites: &[CallSite]) -> Vec<AuthIssue> {
        if route.category != RouteCategory::Data {
            return Vec::new();
        }
        self.matchers
            .iter()
            .flat_map(|m| {
                let issues = m.check(route, call_sites);
                if !issues.is_empty() {
                    tracing::debug!(
                        matcher = m.id(),
                        function = %route.function_name,
                        issues = issues.len(),
                        "layer-2 findings"
                    );
                }
                issues
            })
            .collect()
    }
}

impl Default for Layer2Suite {
    fn default() -> Self {
        Self::new()
    }
}

/// First call site with `role`, by sequence index.
pub(crate) fn first_with_role(call_sites: &[CallSite], role: CallRole) -> Option<&CallSite> {
    call_sites
        .iter()
        .filter(|c| c.role == role)
        .min_by_key(|c| c.sequence_index)
}

pub(crate) fn layer2_error(
    issue_id: &str,
    route: &Arc<RouteHandler>,
    line_number: u32,
    message: String,
) -> AuthIssue {
    AuthIssue {
        issue_id: issue_id.to_string(),
        layer: Layer::ResourceAuth,
        severity: Severity::Error,
        route: Arc::clone(route),
        line_number,
        message,
    }
}
