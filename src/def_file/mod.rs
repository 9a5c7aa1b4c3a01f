//! Doxygen-annotated `.def` node type tables.
//!
//! A `.def` file is a C preprocessor include whose rows look like
//! `DEF_TYPE("pair", DEFINITION_VARIABLE, FIND_PROPERTY, NONE, 0)`, grouped
//! into categories with `@defgroup ... @{ ... @}` comment blocks.

pub mod lexer;
pub mod parser;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::diagnostic::{Diagnostic, Location};

/// One `DEF_TYPE` row. Expression columns are kept verbatim; resolution into
/// typed values happens in `validate` and `registry`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTypeDef {
    pub raw_type: String,
    pub semantic_type: String,
    pub name_extraction: String,
    pub native_extraction: String,
    pub flags: String,
    pub brief: Option<String>,
    pub group: Option<String>,
    #[serde(skip)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefGroup {
    pub name: String,
    pub title: String,
    pub brief: String,
    pub description: String,
    pub node_types: Vec<NodeTypeDef>,
    #[serde(skip)]
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LanguageDoc {
    /// Page title name: the title-cased file stem, e.g. `Json`.
    pub language: String,
    /// Path used in diagnostics.
    pub path: String,
    /// Bare file name used in the generated footer, e.g. `json_types.def`.
    pub file_name: String,
    pub file_brief: String,
    pub file_details: String,
    pub characteristics: String,
    pub groups: Vec<DefGroup>,
    pub ungrouped: Vec<NodeTypeDef>,
}

impl LanguageDoc {
    /// File prefix without the `_types.def` suffix (`json_types.def` → `json`).
    pub fn prefix(&self) -> &str {
        language_prefix(&self.file_name)
    }

    /// All rows in source order, grouped and ungrouped interleaved.
    pub fn rows(&self) -> Vec<&NodeTypeDef> {
        let mut rows: Vec<&NodeTypeDef> = self
            .groups
            .iter()
            .flat_map(|g| g.node_types.iter())
            .chain(self.ungrouped.iter())
            .collect();
        rows.sort_by_key(|r| r.location);
        rows
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.node_types.len()).sum::<usize>() + self.ungrouped.len()
    }
}

#[derive(Debug)]
pub struct ParsedDef {
    pub doc: LanguageDoc,
    /// Structural problems found while parsing (`Def/Syntax`, `Def/UnclosedGroup`).
    pub diagnostics: Vec<Diagnostic>,
}

pub fn language_prefix(file_name: &str) -> &str {
    let stem = file_name.strip_suffix(".def").unwrap_or(file_name);
    stem.strip_suffix("_types").unwrap_or(stem)
}

/// Read and parse a `.def` file from disk.
pub fn parse_def_file(path: &Path) -> Result<ParsedDef> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_def_source(&path.to_string_lossy(), &text))
}

/// Parse `.def` text. `path` names the file for diagnostics and the footer.
pub fn parse_def_source(path: &str, text: &str) -> ParsedDef {
    let tokens = lexer::Lexer::new(text).tokenize();
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let language = crate::languages::title_name(language_prefix(&file_name));
    let doc = LanguageDoc {
        language,
        path: path.to_string(),
        file_name,
        ..LanguageDoc::default()
    };
    parser::Parser::new(tokens, doc).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_from_file_name() {
        assert_eq!(language_prefix("json_types.def"), "json");
        assert_eq!(language_prefix("c_sharp_types.def"), "c_sharp");
        assert_eq!(language_prefix("odd.def"), "odd");
    }

    #[test]
    fn rows_follow_source_order() {
        let parsed = parse_def_source(
            "x_types.def",
            r#"DEF_TYPE("a", LITERAL_STRING, NONE, NONE, 0)
/** @defgroup g G
 * @{ */
DEF_TYPE("b", LITERAL_STRING, NONE, NONE, 0)
/** @} */
DEF_TYPE("c", LITERAL_STRING, NONE, NONE, 0)
"#,
        );
        let names: Vec<&str> = parsed.doc.rows().iter().map(|r| r.raw_type.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(parsed.doc.row_count(), 3);
        assert_eq!(parsed.doc.ungrouped.len(), 2);
    }

    #[test]
    fn language_name_is_title_cased_stem() {
        assert_eq!(parse_def_source("json_types.def", "").doc.language, "Json");
        assert_eq!(
            parse_def_source("dir/my_lang_types.def", "").doc.language,
            "My Lang"
        );
        assert_eq!(parse_def_source("dir/my_lang_types.def", "").doc.file_name, "my_lang_types.def");
    }

    #[test]
    fn parse_def_file_missing() {
        let err = parse_def_file(Path::new("/nonexistent/x_types.def")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }
}
