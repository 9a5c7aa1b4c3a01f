//! Concrete syntax trees produced by language adapters.
//!
//! Nodes live in an arena indexed by [`NodeId`]; node 0 is the root. Kinds use
//! the tree-sitter vocabulary of the grammar so `.def` tables apply directly.

pub mod source;

pub use source::SourceFile;

use crate::diagnostic::Location;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: &'static str,
    /// Named nodes are grammar rules; anonymous nodes are literal tokens like `{`.
    pub named: bool,
    pub start: usize,
    pub end: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: SourceFile,
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub fn new(source: SourceFile) -> Self {
        Self {
            source,
            nodes: Vec::new(),
        }
    }

    /// Append a node; it becomes the last child of `parent`.
    pub fn push(
        &mut self,
        kind: &'static str,
        named: bool,
        start: usize,
        end: usize,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SyntaxNode {
            kind,
            named,
            start,
            end,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        id
    }

    pub fn set_end(&mut self, id: NodeId, end: usize) {
        self.nodes[id].end = end;
    }

    /// Change a node's kind after the fact, e.g. to mark it as an `ERROR`.
    pub fn retag(&mut self, id: NodeId, kind: &'static str, named: bool) {
        self.nodes[id].kind = kind;
        self.nodes[id].named = named;
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() { None } else { Some(0) }
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> &'static str {
        self.nodes[id].kind
    }

    pub fn text(&self, id: NodeId) -> &str {
        let node = &self.nodes[id];
        self.source.as_str().get(node.start..node.end).unwrap_or("")
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn start_location(&self, id: NodeId) -> Location {
        self.source.location(self.nodes[id].start)
    }

    pub fn end_location(&self, id: NodeId) -> Location {
        self.source.location(self.nodes[id].end)
    }

    /// First direct child whose kind is one of `kinds`.
    pub fn find_child(&self, id: NodeId, kinds: &[&str]) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| kinds.contains(&self.kind(c)))
    }

    /// First descendant (depth-first, pre-order, excluding `id`) whose kind is one of `kinds`.
    pub fn find_descendant(&self, id: NodeId, kinds: &[&str]) -> Option<NodeId> {
        for &child in self.children(id) {
            if kinds.contains(&self.kind(child)) {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, kinds) {
                return Some(found);
            }
        }
        None
    }

    /// Pre-order traversal yielding `(node, depth)`; the root has depth 0.
    pub fn preorder(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root() else {
            return out;
        };
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for &child in self.children(id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}
