//! Language adapters: parse source into a `SyntaxTree` and classify its nodes
//! through a `NodeConfigTable`.

pub mod json;
pub mod json_parser;

use anyhow::Result;
use serde::Serialize;

use crate::extraction::{NameExtraction, NodeFlags};
use crate::registry::{NodeConfig, NodeConfigTable};
use crate::syntax::{NodeId, SourceFile, SyntaxTree};

pub use json::JsonAdapter;

pub trait LanguageAdapter: Send + Sync {
    /// Canonical language name, e.g. `json`.
    fn language_name(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// File extensions without the dot.
    fn extensions(&self) -> &'static [&'static str];

    fn parse(&self, source: SourceFile) -> SyntaxTree;

    fn node_configs(&self) -> &NodeConfigTable;

    /// Child kinds `FIND_PROPERTY` looks for.
    fn property_kinds(&self) -> &'static [&'static str] {
        &["property_identifier"]
    }

    fn node_config(&self, kind: &str) -> Option<&NodeConfig> {
        self.node_configs().get(kind)
    }

    fn normalized_type(&self, kind: &str) -> String {
        self.node_configs().normalized_type(kind)
    }

    fn flags(&self, kind: &str) -> NodeFlags {
        self.node_configs().flags(kind)
    }

    fn is_public(&self, _tree: &SyntaxTree, _node: NodeId) -> bool {
        true
    }

    fn extract_name(&self, tree: &SyntaxTree, node: NodeId) -> String {
        match self.node_config(tree.kind(node)) {
            Some(config) if config.name_strategy == NameExtraction::Custom => {
                self.extract_custom_name(tree, node)
            }
            Some(config) => extract_by_strategy(tree, node, config.name_strategy, self.property_kinds()),
            None => String::new(),
        }
    }

    /// Hook for rows whose name strategy is `CUSTOM`.
    fn extract_custom_name(&self, _tree: &SyntaxTree, _node: NodeId) -> String {
        String::new()
    }
}

const QUALIFIED_KINDS: &[&str] = &[
    "qualified_identifier",
    "scoped_identifier",
    "nested_identifier",
    "property_identifier",
];
const QUALIFIED_CONTAINERS: &[&str] = &[
    "function_declarator",
    "method_declarator",
    "declarator",
    "class_body",
    "interface_body",
];
const DECLARATOR_KINDS: &[&str] = &[
    "function_declarator",
    "method_declarator",
    "declarator",
    "procedure_declarator",
    "init_declarator",
];
const MEMBER_KINDS: &[&str] = &[
    "member_expression",
    "field_expression",
    "attribute",
    "selector_expression",
    "navigation_expression",
    "scoped_identifier",
];

fn child_text(tree: &SyntaxTree, node: NodeId, kinds: &[&str]) -> String {
    tree.find_child(node, kinds)
        .map(|c| tree.text(c).to_string())
        .unwrap_or_default()
}

/// Derive a node's name with one of the shared strategies. `CUSTOM` yields an
/// empty name here; adapters handle it through `extract_custom_name`.
pub fn extract_by_strategy(
    tree: &SyntaxTree,
    node: NodeId,
    strategy: NameExtraction,
    property_kinds: &[&str],
) -> String {
    match strategy {
        NameExtraction::None | NameExtraction::Custom => String::new(),
        NameExtraction::NodeText => tree.text(node).to_string(),
        NameExtraction::FirstChild => tree
            .children(node)
            .first()
            .map(|&c| tree.text(c).to_string())
            .unwrap_or_default(),
        NameExtraction::FindIdentifier => {
            let name = child_text(tree, node, &["identifier"]);
            if name.is_empty() {
                child_text(tree, node, &["qualified_identifier"])
            } else {
                name
            }
        }
        NameExtraction::FindProperty => match tree.find_child(node, property_kinds) {
            Some(c) if tree.kind(c) == "string" => unquote(tree.text(c)).to_string(),
            Some(c) => tree.text(c).to_string(),
            None => String::new(),
        },
        NameExtraction::FindAssignmentTarget => assignment_target(tree, node),
        NameExtraction::FindQualifiedIdentifier => qualified_name(tree, node),
        NameExtraction::FindInDeclarator => declarator_name(tree, node),
        NameExtraction::FindCallTarget => call_target(tree, node),
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

fn assignment_target(tree: &SyntaxTree, node: NodeId) -> String {
    let Some(parent) = tree.parent(node) else {
        return String::new();
    };
    let kind = tree.kind(parent);
    if kind != "binary_operator" && !kind.contains("declarator") {
        return String::new();
    }
    match tree.children(parent).first() {
        Some(&first) if tree.kind(first) == "identifier" => tree.text(first).to_string(),
        _ => String::new(),
    }
}

/// Last `identifier` of a qualified node (`A::b` → `b`), or its whole text.
fn last_segment(tree: &SyntaxTree, qualified: NodeId) -> String {
    tree.children(qualified)
        .iter()
        .rev()
        .find(|&&c| tree.kind(c) == "identifier")
        .map(|&c| tree.text(c).to_string())
        .unwrap_or_else(|| tree.text(qualified).to_string())
}

fn qualified_name(tree: &SyntaxTree, node: NodeId) -> String {
    for &kind in QUALIFIED_KINDS {
        if let Some(q) = tree.find_child(node, &[kind]) {
            return last_segment(tree, q);
        }
    }
    for &kind in QUALIFIED_CONTAINERS {
        if let Some(container) = tree.find_child(node, &[kind]) {
            let name = qualified_name(tree, container);
            if !name.is_empty() {
                return name;
            }
        }
    }
    child_text(tree, node, &["identifier"])
}

fn declarator_name(tree: &SyntaxTree, node: NodeId) -> String {
    for &kind in DECLARATOR_KINDS {
        if let Some(decl) = tree.find_child(node, &[kind]) {
            let name = qualified_name(tree, decl);
            if !name.is_empty() {
                return name;
            }
        }
    }
    let name = child_text(tree, node, &["identifier"]);
    if !name.is_empty() {
        return name;
    }
    function_name_from_text(tree.text(node)).to_string()
}

/// Last resort for malformed trees: the identifier right before the first `(`
/// in `ReturnType Class::name(args)`.
fn function_name_from_text(text: &str) -> &str {
    let Some(paren) = text.find('(') else {
        return "";
    };
    let before = text[..paren].trim_end();
    let start = before
        .rfind(|c: char| c.is_whitespace() || c == ':' || c == '*' || c == '&')
        .map_or(0, |i| i + before[i..].chars().next().map_or(1, char::len_utf8));
    let name = before[start..].trim();
    match name.chars().next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '~' => name,
        _ => "",
    }
}

/// Method or function name of a call: `obj.method(...)` → `method`,
/// `f(...)` → `f`.
fn call_target(tree: &SyntaxTree, node: NodeId) -> String {
    let Some(&callee) = tree.children(node).iter().find(|&&c| tree.node(c).named) else {
        return String::new();
    };
    if tree.kind(callee) == "identifier" {
        return tree.text(callee).to_string();
    }
    if MEMBER_KINDS.contains(&tree.kind(callee)) {
        if let Some(&last) = tree.children(callee).iter().rev().find(|&&c| tree.node(c).named) {
            return tree.text(last).to_string();
        }
    }
    child_text(tree, node, &["identifier"])
}

/// One flattened node row, in pre-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AstNode {
    pub node_id: usize,
    pub kind: String,
    pub semantic_type: String,
    pub name: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub parent_id: Option<usize>,
    pub depth: usize,
    pub children_count: usize,
    pub flags: u8,
}

/// Flatten `tree` into rows numbered in pre-order.
pub fn flatten(tree: &SyntaxTree, adapter: &dyn LanguageAdapter) -> Vec<AstNode> {
    let order = tree.preorder();
    let mut row_of = vec![0usize; tree.len()];
    for (row, &(id, _)) in order.iter().enumerate() {
        row_of[id] = row;
    }
    order
        .iter()
        .enumerate()
        .map(|(row, &(id, depth))| {
            let kind = tree.kind(id);
            let start = tree.start_location(id);
            let end = tree.end_location(id);
            AstNode {
                node_id: row,
                kind: kind.to_string(),
                semantic_type: adapter.normalized_type(kind),
                name: adapter.extract_name(tree, id),
                start_line: start.line,
                start_column: start.column,
                end_line: end.line,
                end_column: end.column,
                parent_id: tree.parent(id).map(|p| row_of[p]),
                depth,
                children_count: tree.children(id).len(),
                flags: adapter.flags(kind).bits(),
            }
        })
        .collect()
}

/// The adapters compiled into this crate.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn LanguageAdapter>>,
}

impl AdapterRegistry {
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            adapters: vec![Box::new(JsonAdapter::new()?)],
        })
    }

    /// Look up by canonical name or alias, case-insensitively.
    pub fn get(&self, language: &str) -> Option<&dyn LanguageAdapter> {
        let language = language.to_lowercase();
        self.adapters
            .iter()
            .find(|a| a.language_name() == language || a.aliases().contains(&language.as_str()))
            .map(|a| a.as_ref())
    }

    pub fn for_extension(&self, ext: &str) -> Option<&dyn LanguageAdapter> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.adapters
            .iter()
            .find(|a| a.extensions().contains(&ext.as_str()))
            .map(|a| a.as_ref())
    }

    pub fn languages(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.language_name()).collect()
    }
}
