//! Node configuration tables: `.def` rows resolved into typed lookups.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};

use crate::def_file::LanguageDoc;
use crate::extraction::{NameExtraction, NativeExtraction, NodeFlags};
use crate::semantic::SemanticType;
use crate::semantic::expr::parse_semantic_expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    pub semantic_type: SemanticType,
    pub name_strategy: NameExtraction,
    pub native_strategy: NativeExtraction,
    pub flags: NodeFlags,
}

#[derive(Debug, Clone, Default)]
pub struct NodeConfigTable {
    entries: Vec<(String, NodeConfig)>,
    index: HashMap<String, usize>,
}

impl NodeConfigTable {
    /// Resolve every row of `doc`. When a node type appears more than once
    /// the first definition in source order is kept.
    pub fn from_doc(doc: &LanguageDoc) -> Result<NodeConfigTable> {
        let mut table = NodeConfigTable::default();
        for row in doc.rows() {
            let at = || format!("{}:{}: `{}`", doc.path, row.location.line, row.raw_type);
            let semantic_type = parse_semantic_expr(&row.semantic_type).with_context(at)?;
            let name_strategy = NameExtraction::from_name(&row.name_extraction)
                .ok_or_else(|| anyhow!("unknown name extraction `{}`", row.name_extraction))
                .with_context(at)?;
            let native_strategy = NativeExtraction::from_name(&row.native_extraction)
                .ok_or_else(|| anyhow!("unknown native extraction `{}`", row.native_extraction))
                .with_context(at)?;
            let flags = NodeFlags::parse_expr(&row.flags)
                .ok_or_else(|| anyhow!("cannot parse flags `{}`", row.flags))
                .with_context(at)?;
            table.insert(
                &row.raw_type,
                NodeConfig {
                    semantic_type,
                    name_strategy,
                    native_strategy,
                    flags,
                },
            );
        }
        Ok(table)
    }

    /// Insert unless `kind` is already present. Returns whether it was inserted.
    pub fn insert(&mut self, kind: &str, config: NodeConfig) -> bool {
        if self.index.contains_key(kind) {
            return false;
        }
        self.index.insert(kind.to_string(), self.entries.len());
        self.entries.push((kind.to_string(), config));
        true
    }

    pub fn get(&self, kind: &str) -> Option<&NodeConfig> {
        self.index.get(kind).map(|&i| &self.entries[i].1)
    }

    /// Semantic type name for a mapped kind, otherwise the kind itself.
    pub fn normalized_type(&self, kind: &str) -> String {
        match self.get(kind) {
            Some(config) => config.semantic_type.name().to_string(),
            None => kind.to_string(),
        }
    }

    pub fn flags(&self, kind: &str) -> NodeFlags {
        self.get(kind).map_or(NodeFlags::EMPTY, |c| c.flags)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeConfig)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }
}
