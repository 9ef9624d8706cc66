//! Call-site types.

use serde::{Deserialize, Serialize};

use crate::vocabulary::CallRole;

/// One authorization-relevant invocation inside a handler body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    /// Normalized callee: last attribute segment, or the RPC name.
    pub callee_name: String,
    pub role: CallRole,
    /// 1-based line of the call's first token.
    pub line_number: u32,
    /// Pre-order visit counter over call expressions in the body.
    /// Authoritative for ordering; line numbers are not.
    pub sequence_index: u32,
    /// Blocks between the function body and the call; 0 = top level.
    pub depth: u32,
    pub has_exception_annotation: bool,
}
