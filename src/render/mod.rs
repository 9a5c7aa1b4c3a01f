//! Markdown reference pages.
//!
//! Rendering is pure: the same `LanguageDoc` always produces the same bytes,
//! which is what `--check` relies on.

pub mod index;
pub mod page;
pub mod taxonomy;

pub use index::{IndexEntry, IndexOptions, render_index};
pub use page::render_language;
pub use taxonomy::{TaxonomyRow, render_taxonomy_markdown, render_taxonomy_text, taxonomy_rows};

/// Strip namespace qualifiers the reader does not need:
/// `ASTSemanticType::X | SemanticRefinements::G::V` → `X | G::V`.
pub fn format_semantic_type(expr: &str) -> String {
    expr.replace("SemanticRefinements::", "")
        .replace("ASTSemanticType::", "")
}

/// GitHub-style heading anchor as used in the category list.
pub fn anchor(title: &str) -> String {
    title.to_lowercase().replace([' ', '/'], "-")
}

/// Escape text for a Markdown table cell.
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_type_prefixes_removed() {
        assert_eq!(
            format_semantic_type("ASTSemanticType::LITERAL_STRUCTURED | SemanticRefinements::Structured::MAPPING"),
            "LITERAL_STRUCTURED | Structured::MAPPING"
        );
        assert_eq!(format_semantic_type("PARSER_DELIMITER"), "PARSER_DELIMITER");
    }

    #[test]
    fn anchors() {
        assert_eq!(anchor("Literals and Values"), "literals-and-values");
        assert_eq!(anchor("Import/Export"), "import-export");
    }

    #[test]
    fn cell_escaping() {
        assert_eq!(escape_cell("a | b"), "a \\| b");
        assert_eq!(escape_cell("`|`"), "`\\|`");
        assert_eq!(escape_cell("two\nlines"), "two lines");
    }
}
