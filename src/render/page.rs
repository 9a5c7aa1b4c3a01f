use super::{anchor, escape_cell, format_semantic_type};
use crate::def_file::{LanguageDoc, NodeTypeDef};

const TABLE_HEADER: &str = "| Node Type | Semantic Type | Name Extraction | Description |";
const TABLE_RULE: &str = "|-----------|---------------|-----------------|-------------|";

fn code_span(raw: &str) -> String {
    if raw.contains('`') {
        format!("`` {} ``", escape_cell(raw))
    } else {
        format!("`{}`", escape_cell(raw))
    }
}

fn push_table(md: &mut Vec<String>, rows: &[NodeTypeDef]) {
    md.push(TABLE_HEADER.to_string());
    md.push(TABLE_RULE.to_string());
    for row in rows {
        md.push(format!(
            "| {} | {} | {} | {} |",
            code_span(&row.raw_type),
            escape_cell(&format_semantic_type(&row.semantic_type)),
            escape_cell(&row.name_extraction),
            escape_cell(row.brief.as_deref().unwrap_or("")),
        ));
    }
    md.push(String::new());
}

/// Render one language's node type reference page.
pub fn render_language(doc: &LanguageDoc) -> String {
    let mut md: Vec<String> = Vec::new();

    md.push(format!("# {} Node Types", doc.language));
    md.push(String::new());

    if !doc.file_brief.is_empty() {
        md.push(format!("> {}", doc.file_brief));
        md.push(String::new());
    }

    if !doc.characteristics.is_empty() {
        md.push("## Language Characteristics".to_string());
        md.push(String::new());
        md.push(doc.characteristics.clone());
        md.push(String::new());
    }

    if !doc.groups.is_empty() {
        md.push("## Node Categories".to_string());
        md.push(String::new());
        for group in &doc.groups {
            md.push(format!("- [{}](#{})", group.title, anchor(&group.title)));
        }
        md.push(String::new());
    }

    for group in &doc.groups {
        md.push(format!("## {}", group.title));
        md.push(String::new());
        if !group.brief.is_empty() {
            md.push(group.brief.clone());
            md.push(String::new());
        }
        if !group.description.is_empty() {
            md.push(group.description.clone());
            md.push(String::new());
        }
        if !group.node_types.is_empty() {
            push_table(&mut md, &group.node_types);
        }
    }

    if !doc.ungrouped.is_empty() {
        md.push("## Other Node Types".to_string());
        md.push(String::new());
        push_table(&mut md, &doc.ungrouped);
    }

    md.push("---".to_string());
    md.push(String::new());
    md.push(format!("*Generated from `{}`*", doc.file_name));
    md.push(String::new());

    md.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def_file::parse_def_source;

    const SRC: &str = r#"/**
 * @file demo_types.def
 * @brief Demo definitions
 *
 * ## Demo Language Characteristics
 * - Tiny
 *
 * @see semantic_types.hpp
 */

/**
 * @defgroup demo_values Literals and Values
 * @brief Scalar values
 *
 * Leaf nodes.
 * @{
 */

/// @brief String literal
DEF_TYPE("string", LITERAL_STRING, NODE_TEXT, NONE, 0)

/// @brief Pipe operator
DEF_TYPE("|", OPERATOR_LOGICAL, NONE, NONE, 0)

/** @} */

DEF_TYPE("map", LITERAL_STRUCTURED | SemanticRefinements::Structured::MAPPING, NONE, NONE, 0)
"#;

    #[test]
    fn full_page_layout() {
        let doc = parse_def_source("demo_types.def", SRC).doc;
        let expected = "\
# Demo Node Types

> Demo definitions

## Language Characteristics

- Tiny

## Node Categories

- [Literals and Values](#literals-and-values)

## Literals and Values

Scalar values

Leaf nodes.

| Node Type | Semantic Type | Name Extraction | Description |
|-----------|---------------|-----------------|-------------|
| `string` | LITERAL_STRING | NODE_TEXT | String literal |
| `\\|` | OPERATOR_LOGICAL | NONE | Pipe operator |

## Other Node Types

| Node Type | Semantic Type | Name Extraction | Description |
|-----------|---------------|-----------------|-------------|
| `map` | LITERAL_STRUCTURED \\| Structured::MAPPING | NONE |  |

---

*Generated from `demo_types.def`*
";
        assert_eq!(render_language(&doc), expected);
    }

    #[test]
    fn minimal_page_has_only_title_and_footer() {
        let doc = parse_def_source("dir/empty_types.def", "").doc;
        assert_eq!(
            render_language(&doc),
            "# Empty Node Types\n\n---\n\n*Generated from `empty_types.def`*\n"
        );
    }

    #[test]
    fn wrapped_file_brief_keeps_line_break() {
        let src = "/**\n * @file\n * @brief First line\n *        second line\n */\n";
        let md = render_language(&parse_def_source("wrap_types.def", src).doc);
        assert!(md.starts_with("# Wrap Node Types\n\n> First line\n"), "{md}");
        assert!(md.contains("second line"), "{md}");
    }

    #[test]
    fn backtick_node_types() {
        assert_eq!(code_span("`"), "`` ` ``");
        assert_eq!(code_span("{"), "`{`");
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = parse_def_source("demo_types.def", SRC).doc;
        assert_eq!(render_language(&doc), render_language(&doc.clone()));
    }
}
