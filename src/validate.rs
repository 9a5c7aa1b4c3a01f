//! Integrity checks over a parsed `LanguageDoc`.
//!
//! Every check produces `Diagnostic`s named `Def/<Check>`; nothing here
//! returns an error. Callers decide what to do with the severities.

use std::collections::HashMap;

use serde::Serialize;

use crate::def_file::{LanguageDoc, NodeTypeDef};
use crate::diagnostic::{Diagnostic, Severity};
use crate::extraction::{NameExtraction, NativeExtraction, NodeFlags};
use crate::semantic::expr::parse_semantic_expr;

/// Row counts per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefStats {
    pub groups: Vec<GroupCount>,
    pub ungrouped: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub title: String,
    pub rows: usize,
}

impl DefStats {
    pub fn of(doc: &LanguageDoc) -> Self {
        let groups: Vec<GroupCount> = doc
            .groups
            .iter()
            .map(|g| GroupCount {
                title: g.title.clone(),
                rows: g.node_types.len(),
            })
            .collect();
        let ungrouped = doc.ungrouped.len();
        let total = groups.iter().map(|g| g.rows).sum::<usize>() + ungrouped;
        DefStats {
            groups,
            ungrouped,
            total,
        }
    }
}

pub fn validate(doc: &LanguageDoc) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut emit = |row: &NodeTypeDef, severity: Severity, check: &str, message: String| {
        diagnostics.push(Diagnostic::new(&doc.path, row.location, severity, check, message));
    };

    for row in doc.rows() {
        check_row(row, &mut emit);
    }

    // Duplicates within a category are errors; across categories the first
    // definition wins at runtime, so later ones are only shadowed.
    let mut first_seen: HashMap<&str, &NodeTypeDef> = HashMap::new();
    for row in doc.rows() {
        match first_seen.get(row.raw_type.as_str()) {
            None => {
                first_seen.insert(&row.raw_type, row);
            }
            Some(first) if first.group == row.group => emit(
                row,
                Severity::Error,
                "Def/DuplicateNodeType",
                format!(
                    "`{}` already defined in this category at line {}",
                    row.raw_type, first.location.line
                ),
            ),
            Some(first) => emit(
                row,
                Severity::Warning,
                "Def/ShadowedNodeType",
                format!(
                    "`{}` is shadowed by the definition in {} at line {}",
                    row.raw_type,
                    first.group.as_deref().map_or("ungrouped rows".to_string(), |g| format!("group `{g}`")),
                    first.location.line
                ),
            ),
        }
    }

    for group in &doc.groups {
        if group.node_types.is_empty() {
            diagnostics.push(Diagnostic::new(
                &doc.path,
                group.location,
                Severity::Warning,
                "Def/EmptyGroup",
                format!("group `{}` has no DEF_TYPE rows", group.name),
            ));
        }
    }

    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    diagnostics
}

fn check_row(row: &NodeTypeDef, emit: &mut impl FnMut(&NodeTypeDef, Severity, &str, String)) {
    if let Err(e) = parse_semantic_expr(&row.semantic_type) {
        let check = if e.is_refinement_error() {
            "Def/InvalidRefinement"
        } else {
            "Def/UnknownSemanticType"
        };
        emit(row, Severity::Error, check, format!("`{}`: {e}", row.raw_type));
    }

    if NameExtraction::from_name(&row.name_extraction).is_none() {
        emit(
            row,
            Severity::Error,
            "Def/UnknownNameExtraction",
            format!("unknown name extraction `{}`", row.name_extraction),
        );
    }

    if NativeExtraction::from_name(&row.native_extraction).is_none() {
        emit(
            row,
            Severity::Error,
            "Def/UnknownNativeExtraction",
            format!("unknown native extraction `{}`", row.native_extraction),
        );
    }

    if NodeFlags::parse_expr(&row.flags).is_none() {
        emit(
            row,
            Severity::Error,
            "Def/UnknownFlag",
            format!("cannot parse flags `{}`", row.flags),
        );
    }

    if row.brief.as_deref().is_none_or(str::is_empty) {
        emit(
            row,
            Severity::Convention,
            "Def/MissingDescription",
            format!("`{}` has no @brief description", row.raw_type),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def_file::parse_def_source;

    fn checks(src: &str) -> Vec<(String, Severity, usize)> {
        let doc = parse_def_source("t_types.def", src).doc;
        validate(&doc)
            .into_iter()
            .map(|d| (d.check_name, d.severity, d.location.line))
            .collect()
    }

    #[test]
    fn clean_document() {
        let src = "/** @defgroup g G\n * @{ */\n/// @brief a\nDEF_TYPE(\"a\", LITERAL_STRING, NODE_TEXT, NONE, 0)\n/** @} */\n";
        assert!(checks(src).is_empty());
    }

    #[test]
    fn vocabulary_checks() {
        let src = r#"/// @brief x
DEF_TYPE("a", LITERAL_BOGUS, NODE_TEXT, NONE, 0)
/// @brief x
DEF_TYPE("b", LITERAL_STRING | Structured::MAPPING, NODE_TEXT, NONE, 0)
/// @brief x
DEF_TYPE("c", LITERAL_STRING, GUESS, NONE, 0)
/// @brief x
DEF_TYPE("d", LITERAL_STRING, NONE, MAGIC, 0)
/// @brief x
DEF_TYPE("e", LITERAL_STRING, NONE, NONE, IS_PUBLIC)
"#;
        let names: Vec<String> = checks(src).into_iter().map(|c| c.0).collect();
        assert_eq!(
            names,
            vec![
                "Def/UnknownSemanticType",
                "Def/InvalidRefinement",
                "Def/UnknownNameExtraction",
                "Def/UnknownNativeExtraction",
                "Def/UnknownFlag",
            ]
        );
    }

    #[test]
    fn duplicates_and_shadowing() {
        let src = r#"/** @defgroup g1 One
 * @{ */
/// @brief x
DEF_TYPE("a", LITERAL_STRING, NONE, NONE, 0)
/// @brief x
DEF_TYPE("a", LITERAL_STRING, NONE, NONE, 0)
/** @} */
/** @defgroup g2 Two
 * @{ */
/// @brief x
DEF_TYPE("a", LITERAL_NUMBER, NONE, NONE, 0)
/** @} */
"#;
        assert_eq!(
            checks(src),
            vec![
                ("Def/DuplicateNodeType".to_string(), Severity::Error, 6),
                ("Def/ShadowedNodeType".to_string(), Severity::Warning, 11),
            ]
        );
    }

    #[test]
    fn empty_group_and_missing_description() {
        let src = "/** @defgroup g G\n * @{ */\n/** @} */\nDEF_TYPE(\"a\", LITERAL_STRING, NONE, NONE, 0)\n";
        assert_eq!(
            checks(src),
            vec![
                ("Def/EmptyGroup".to_string(), Severity::Warning, 1),
                ("Def/MissingDescription".to_string(), Severity::Convention, 4),
            ]
        );
    }

    #[test]
    fn stats_total_is_sum_of_parts() {
        let src = "/** @defgroup g G\n * @{ */\nDEF_TYPE(\"a\", LITERAL_STRING, NONE, NONE, 0)\nDEF_TYPE(\"b\", LITERAL_STRING, NONE, NONE, 0)\n/** @} */\nDEF_TYPE(\"c\", LITERAL_STRING, NONE, NONE, 0)\n";
        let doc = parse_def_source("t_types.def", src).doc;
        let stats = DefStats::of(&doc);
        assert_eq!(stats.groups[0].rows, 2);
        assert_eq!(stats.ungrouped, 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.total, doc.row_count());
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn stats_total_matches_rows(sizes in prop::collection::vec(0usize..6, 0..5), loose in 0usize..4) {
                let mut src = String::new();
                let mut n = 0;
                for (gi, size) in sizes.iter().enumerate() {
                    src.push_str(&format!("/** @defgroup g{gi} Group {gi}\n * @{{ */\n"));
                    for _ in 0..*size {
                        src.push_str(&format!("DEF_TYPE(\"t{n}\", LITERAL_STRING, NONE, NONE, 0)\n"));
                        n += 1;
                    }
                    src.push_str("/** @} */\n");
                }
                for _ in 0..loose {
                    src.push_str(&format!("DEF_TYPE(\"t{n}\", LITERAL_STRING, NONE, NONE, 0)\n"));
                    n += 1;
                }
                let doc = parse_def_source("p_types.def", &src).doc;
                let stats = DefStats::of(&doc);
                prop_assert_eq!(stats.total, n);
                prop_assert_eq!(stats.groups.len(), sizes.len());
                prop_assert_eq!(stats.ungrouped, loose);
            }
        }
    }
}
