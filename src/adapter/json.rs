use anyhow::{Context, Result};

use super::LanguageAdapter;
use super::json_parser::parse_json;
use crate::def_file::{ParsedDef, parse_def_source};
use crate::registry::NodeConfigTable;
use crate::syntax::{SourceFile, SyntaxTree};

pub const JSON_TYPES_DEF: &str = include_str!("../language_configs/json_types.def");

/// Parse the embedded `json_types.def`.
pub fn json_types() -> ParsedDef {
    parse_def_source("json_types.def", JSON_TYPES_DEF)
}

pub struct JsonAdapter {
    table: NodeConfigTable,
}

impl JsonAdapter {
    pub fn new() -> Result<Self> {
        let table = NodeConfigTable::from_doc(&json_types().doc)
            .context("embedded json_types.def is invalid")?;
        Ok(Self { table })
    }
}

impl LanguageAdapter for JsonAdapter {
    fn language_name(&self) -> &'static str {
        "json"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["json", "jsonc"]
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json", "jsonc", "geojson", "jsonl"]
    }

    fn parse(&self, source: SourceFile) -> SyntaxTree {
        parse_json(source)
    }

    fn node_configs(&self) -> &NodeConfigTable {
        &self.table
    }

    /// Pair keys are `string` nodes; their unquoted text names the pair.
    fn property_kinds(&self) -> &'static [&'static str] {
        &["string"]
    }
}
