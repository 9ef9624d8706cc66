//! Call-sequence extraction.
//!
//! A deterministic pre-order walk over one function body. Every `call`
//! expression bumps the visit counter; calls whose normalized callee is in the
//! vocabulary become `CallSite`s. The walk enters conditionals, loops, `with`
//! and `try` blocks, comprehensions, lambdas and locally defined functions,
//! but never follows a call into another function: helpers imported from
//! elsewhere that wrap these checks are invisible (known false negatives).

pub mod exceptions;
pub mod types;

pub use exceptions::ExceptionMarker;
pub use types::CallSite;

use tree_sitter::Node;

use crate::parsers::{node_text, start_line, string_literal_value};
use crate::vocabulary::Vocabulary;

/// Extracts role-tagged call sequences from handler bodies.
pub struct CallSequenceExtractor<'a> {
    vocabulary: &'a Vocabulary,
    exceptions: &'a ExceptionMarker,
}

impl<'a> CallSequenceExtractor<'a> {
    pub fn new(vocabulary: &'a Vocabulary, exceptions: &'a ExceptionMarker) -> Self {
        Self {
            vocabulary,
            exceptions,
        }
    }

    /// Ordered call sites of a `function_definition` node's body.
    ///
    /// `lines` are the file's source lines, used for exception annotations.
    pub fn extract(&self, function: Node<'_>, source: &str, lines: &[&str]) -> Vec<CallSite> {
        let Some(body) = function.child_by_field_name("body") else {
            return Vec::new();
        };
        let bytes = source.as_bytes();

        let mut sites = Vec::new();
        let mut visited_calls = 0u32;
        let mut stack = Vec::new();
        push_children(&mut stack, body, 0);

        while let Some((node, depth)) = stack.pop() {
            if node.kind() == "call" {
                visited_calls += 1;
                if let Some(name) = self.callee_name(node, bytes) {
                    if let Some(role) = self.vocabulary.classify(&name) {
                        let line_number = start_line(&node);
                        sites.push(CallSite {
                            callee_name: name,
                            role,
                            line_number,
                            sequence_index: visited_calls,
                            depth,
                            has_exception_annotation: self.exceptions.is_annotated(
                                lines,
                                line_number,
                                statement_line(node),
                            ),
                        });
                    }
                }
            }
            let child_depth = if node.kind() == "block" { depth + 1 } else { depth };
            push_children(&mut stack, node, child_depth);
        }

        sites
    }

    /// Normalized callee of a `call` node.
    ///
    /// `f(...)` → `f`; `obj.m(...)` → `m`; `client.rpc("name", ...)` → `name`
    /// when `rpc` is a configured RPC dispatcher.
    fn callee_name(&self, call: Node<'_>, source: &[u8]) -> Option<String> {
        let function = call.child_by_field_name("function")?;
        match function.kind() {
            "identifier" => Some(node_text(&function, source).to_string()),
            "attribute" => {
                let attribute = function.child_by_field_name("attribute")?;
                let method = node_text(&attribute, source);
                if self.vocabulary.is_rpc_callee(method) {
                    if let Some(name) = first_string_argument(call, source) {
                        return Some(name);
                    }
                }
                Some(method.to_string())
            }
            _ => None,
        }
    }
}

fn first_string_argument(call: Node<'_>, source: &[u8]) -> Option<String> {
    let arguments = call.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let first = arguments
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;
    if first.kind() != "string" {
        return None;
    }
    string_literal_value(node_text(&first, source))
}

/// Compound statements and clauses whose header can hold a call.
const HEADER_KINDS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "while_statement",
    "for_statement",
    "with_statement",
    "try_statement",
    "except_clause",
    "match_statement",
    "case_clause",
];

/// 1-based first line of the statement (or clause header) containing `node`.
fn statement_line(node: Node<'_>) -> u32 {
    let mut current = node;
    while let Some(parent) = current.parent() {
        match parent.kind() {
            "block" | "module" => break,
            kind if HEADER_KINDS.contains(&kind) => return start_line(&parent),
            _ => current = parent,
        }
    }
    start_line(&current)
}

/// Push children in reverse so the stack pops them in source order.
fn push_children<'tree>(stack: &mut Vec<(Node<'tree>, u32)>, node: Node<'tree>, depth: u32) {
    let mut cursor = node.walk();
    let children: Vec<Node<'tree>> = node.children(&mut cursor).collect();
    stack.extend(children.into_iter().rev().map(|child| (child, depth)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_python;
    use crate::vocabulary::CallRole;
    use authlint_core::config::exception_config::DEFAULT_EXCEPTION_PATTERN;

    fn extract(source: &str) -> Vec<CallSite> {
        let tree = parse_python(source, "t.py").unwrap();
        let vocab = Vocabulary::builtin().unwrap();
        let marker = ExceptionMarker::new(DEFAULT_EXCEPTION_PATTERN).unwrap();
        let extractor = CallSequenceExtractor::new(&vocab, &marker);
        let root = tree.root_node();
        let mut cursor = root.walk();
        let function = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "function_definition")
            .unwrap();
        let lines: Vec<&str> = source.lines().collect();
        extractor.extract(function, source, &lines)
    }

    fn names(sites: &[CallSite]) -> Vec<&str> {
        sites.iter().map(|s| s.callee_name.as_str()).collect()
    }

    #[test]
    fn extracts_in_source_order() {
        let sites = extract(
            r#"
def handler(event, context):
    org_id = event["org"]
    if not is_org_member(org_id, user):
        return forbidden()
    if not can_access_chat(chat_id, user):
        return forbidden()
    return ok(load(chat_id))
"#,
        );
        assert_eq!(names(&sites), vec!["is_org_member", "can_access_chat"]);
        assert_eq!(sites[0].role, CallRole::MembershipCheck);
        assert_eq!(sites[1].role, CallRole::PermissionCheck);
        assert!(sites[0].sequence_index < sites[1].sequence_index);
        assert_eq!(sites[0].line_number, 4);
    }

    #[test]
    fn sequence_index_counts_every_call() {
        let sites = extract(
            r#"
def handler(event, context):
    log("start")
    parse(event)
    is_org_member(org, user)
"#,
        );
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].sequence_index, 3);
    }

    #[test]
    fn attribute_and_rpc_calls_are_normalized() {
        let sites = extract(
            r#"
def handler(event, context):
    auth.is_org_member(org, user)
    supabase.rpc("can_access_chat", {"p_chat": chat_id}).execute()
"#,
        );
        assert_eq!(names(&sites), vec!["is_org_member", "can_access_chat"]);
    }

    #[test]
    fn rpc_without_literal_name_falls_back_to_method() {
        let sites = extract(
            r#"
def handler(event, context):
    client.rpc(name, {})
"#,
        );
        assert!(sites.is_empty());
    }

    #[test]
    fn nested_blocks_and_local_functions_are_visited() {
        let sites = extract(
            r#"
def handler(event, context):
    def check():
        return is_org_member(org, user)
    for chat in chats:
        if can_access_chat(chat, user):
            yield chat
"#,
        );
        assert_eq!(names(&sites), vec!["is_org_member", "can_access_chat"]);
        assert_eq!(sites[0].depth, 1);
        assert_eq!(sites[1].depth, 1);
    }

    #[test]
    fn depth_tracks_block_nesting() {
        let sites = extract(
            r#"
def handler(event, context):
    is_org_member(org, user)
    if x:
        if y:
            can_access_chat(c, user)
"#,
        );
        assert_eq!(sites[0].depth, 0);
        assert_eq!(sites[1].depth, 2);
    }

    #[test]
    fn outer_call_precedes_its_arguments() {
        let sites = extract(
            r#"
def handler(event, context):
    return can_access_chat(chat, is_org_member(org, user))
"#,
        );
        assert_eq!(names(&sites), vec!["can_access_chat", "is_org_member"]);
    }

    #[test]
    fn await_expressions_are_entered() {
        let sites = extract(
            r#"
async def handler(event, context):
    await is_org_member(org, user)
"#,
        );
        assert_eq!(names(&sites), vec!["is_org_member"]);
    }

    #[test]
    fn exception_annotation_is_recorded() {
        let sites = extract(
            r#"
def handler(event, context):
    # AUTH-STD exception: platform support override
    if is_sys_admin(user):
        return ok()
    is_sys_admin(user)
"#,
        );
        assert_eq!(sites.len(), 2);
        assert!(sites[0].has_exception_annotation);
        assert!(!sites[1].has_exception_annotation);
    }

    #[test]
    fn annotation_does_not_leak_to_the_next_statement() {
        let sites = extract(
            r#"
def handler(event, context):
    a = is_sys_admin(x)  # SEC-1 exception: break-glass
    b = is_sys_admin(y)
"#,
        );
        assert!(sites[0].has_exception_annotation);
        assert!(!sites[1].has_exception_annotation);
    }

    #[test]
    fn comment_above_a_multiline_statement_annotates_its_call() {
        let sites = extract(
            r#"
def handler(event, context):
    # SEC-1 exception: break-glass
    allowed = (
        is_sys_admin(user)
    )
    others = [
        is_sys_admin(other)
    ]
"#,
        );
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].line_number, 5);
        assert!(sites[0].has_exception_annotation);
        assert!(!sites[1].has_exception_annotation);
    }

    #[test]
    fn elif_header_uses_its_own_line() {
        let sites = extract(
            r#"
def handler(event, context):
    # SEC-1 exception: break-glass
    if is_sys_admin(user):
        return ok()
    elif is_sys_admin(other):
        return ok()
"#,
        );
        assert!(sites[0].has_exception_annotation);
        assert!(!sites[1].has_exception_annotation);
    }
}
