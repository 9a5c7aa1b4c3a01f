use serde::Serialize;

use super::escape_cell;
use crate::semantic::SemanticType;
use crate::semantic::refinement::{AppliesTo, GROUPS};

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyRow {
    pub code: String,
    pub name: &'static str,
    pub kind: &'static str,
    pub super_kind: &'static str,
    /// Refinement groups specific to this type or its kind.
    pub refinements: Vec<&'static str>,
    pub summary: &'static str,
}

/// The 64 base types in code order.
pub fn taxonomy_rows() -> Vec<TaxonomyRow> {
    SemanticType::all()
        .map(|t| TaxonomyRow {
            code: format!("0x{:02X}", t.code()),
            name: t.name(),
            kind: t.kind().name(),
            super_kind: t.super_kind().name(),
            refinements: GROUPS
                .iter()
                .filter(|g| g.applies_to != AppliesTo::Any && g.applies_to.accepts(t))
                .map(|g| g.name)
                .collect(),
            summary: t.summary(),
        })
        .collect()
}

/// Column-aligned listing for terminals.
pub fn render_taxonomy_text(rows: &[TaxonomyRow]) -> String {
    let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let kind_width = rows.iter().map(|r| r.kind.len()).max().unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        let line = format!(
            "{}  {:<name_width$}  {:<kind_width$}  {}",
            row.code, row.name, row.kind, row.summary
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_taxonomy_markdown(rows: &[TaxonomyRow]) -> String {
    let mut md: Vec<String> = vec![
        "# Semantic Type Taxonomy".to_string(),
        String::new(),
        "Each semantic type is one byte laid out as `[ss kk tt ll]`: super kind,".to_string(),
        "kind, super type, and a 2-bit language-specific refinement. The table".to_string(),
        "lists the 64 base types (refinement bits zero).".to_string(),
        String::new(),
    ];

    let mut current_super = "";
    for row in rows {
        if row.super_kind != current_super {
            if !current_super.is_empty() {
                md.push(String::new());
            }
            current_super = row.super_kind;
            md.push(format!("## {current_super}"));
            md.push(String::new());
            md.push("| Code | Semantic Type | Kind | Refinements | Description |".to_string());
            md.push("|------|---------------|------|-------------|-------------|".to_string());
        }
        let refinements = if row.refinements.is_empty() {
            "-".to_string()
        } else {
            row.refinements.join(", ")
        };
        md.push(format!(
            "| `{}` | `{}` | {} | {} | {} |",
            row.code,
            row.name,
            row.kind,
            refinements,
            escape_cell(row.summary)
        ));
    }

    let mut out = md.join("\n");
    out.push('\n');
    out
}
