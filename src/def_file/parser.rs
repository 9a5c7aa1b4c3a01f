//! `.def` parser.
//!
//! Walks the token stream from the lexer and assembles a `LanguageDoc`:
//! the file-level doc block, `@defgroup` categories, and `DEF_TYPE` rows with
//! the `@brief` that precedes them.

use std::sync::LazyLock;

use regex::Regex;

use super::lexer::{Spanned, Token, decode_string_literal};
use super::{DefGroup, LanguageDoc, NodeTypeDef, ParsedDef};
use crate::diagnostic::{Diagnostic, Location, Severity};

static DEFGROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@defgroup\s+(\w+)\s+(.+)").unwrap());
static CHARACTERISTICS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s*.+?\s+Language\s+Characteristics\s*$").unwrap());

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    doc: LanguageDoc,
    diagnostics: Vec<Diagnostic>,
    /// Index into `doc.groups` of the group currently open.
    current_group: Option<usize>,
    pending_brief: Option<PendingBrief>,
    seen_file_block: bool,
}

struct PendingBrief {
    text: String,
    /// Last line the brief came from, so `///` continuation lines can extend it.
    line: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>, doc: LanguageDoc) -> Self {
        Self {
            tokens,
            pos: 0,
            doc,
            diagnostics: Vec::new(),
            current_group: None,
            pending_brief: None,
            seen_file_block: false,
        }
    }

    fn advance(&mut self) -> Option<Spanned> {
        let tok = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        Some(tok)
    }

    fn report(&mut self, location: Location, severity: Severity, check: &str, message: String) {
        self.diagnostics.push(Diagnostic::new(
            &self.doc.path,
            location,
            severity,
            check,
            message,
        ));
    }

    pub fn parse(mut self) -> ParsedDef {
        while let Some(Spanned { token, location }) = self.advance() {
            match token {
                Token::DocBlock(text) => self.doc_block(&text, location),
                Token::DocLine(text) => self.doc_line(&text, location),
                Token::DefType(args) => self.def_type(args, location),
                Token::Malformed(_) => {
                    self.pending_brief = None;
                    self.report(
                        location,
                        Severity::Error,
                        "Def/Syntax",
                        "unterminated `DEF_TYPE(` invocation".to_string(),
                    );
                }
            }
        }

        if let Some(idx) = self.current_group.take() {
            self.unclosed_group(idx);
        }

        ParsedDef {
            doc: self.doc,
            diagnostics: self.diagnostics,
        }
    }

    fn unclosed_group(&mut self, idx: usize) {
        let group = &self.doc.groups[idx];
        let (location, name) = (group.location, group.name.clone());
        self.report(
            location,
            Severity::Warning,
            "Def/UnclosedGroup",
            format!("group `{name}` is never closed with `@}}`"),
        );
    }

    fn doc_block(&mut self, text: &str, location: Location) {
        if !self.seen_file_block && text.lines().any(|l| l.starts_with("@file")) {
            self.seen_file_block = true;
            self.file_block(text);
            return;
        }
        if let Some(caps) = DEFGROUP_RE.captures(text) {
            let name = caps[1].to_string();
            let title = caps[2].trim().to_string();
            self.open_group(name, title, text, location);
            return;
        }
        if text.contains("@}") {
            self.close_group();
            return;
        }
        if let Some(brief) = brief_paragraph(text) {
            let line = location.line + text.lines().count().saturating_sub(1);
            self.pending_brief = Some(PendingBrief { text: brief, line });
        }
    }

    fn doc_line(&mut self, text: &str, location: Location) {
        if text.contains("@}") {
            self.close_group();
        } else if let Some(rest) = text.split_once("@brief").map(|(_, r)| r.trim()) {
            self.pending_brief = Some(PendingBrief {
                text: rest.to_string(),
                line: location.line,
            });
        } else if !text.is_empty() && !text.starts_with('@') {
            if let Some(pending) = self.pending_brief.as_mut() {
                if pending.line + 1 == location.line {
                    pending.text.push(' ');
                    pending.text.push_str(text);
                    pending.line = location.line;
                }
            }
        }
    }

    fn open_group(&mut self, name: String, title: String, text: &str, location: Location) {
        if let Some(idx) = self.current_group.take() {
            self.unclosed_group(idx);
        }

        let mut brief = String::new();
        let mut description = Vec::new();
        for line in text.lines().skip_while(|l| !l.contains("@defgroup")).skip(1) {
            let line = line.trim();
            if line.contains("@{") {
                break;
            }
            if let Some(rest) = line.strip_prefix("@brief") {
                brief = rest.trim().to_string();
            } else if !line.is_empty() && !line.starts_with('@') {
                description.push(line);
            }
        }

        self.doc.groups.push(DefGroup {
            name,
            title,
            brief,
            description: description.join(" "),
            node_types: Vec::new(),
            location,
        });
        self.current_group = Some(self.doc.groups.len() - 1);
        self.pending_brief = None;
    }

    fn close_group(&mut self) {
        self.current_group = None;
        self.pending_brief = None;
    }

    fn def_type(&mut self, args: Vec<String>, location: Location) {
        let brief = self.pending_brief.take().map(|b| b.text);

        if args.len() != 5 {
            self.report(
                location,
                Severity::Error,
                "Def/Syntax",
                format!("`DEF_TYPE` takes 5 arguments, found {}", args.len()),
            );
            return;
        }
        let Some(raw_type) = decode_string_literal(&args[0]) else {
            self.report(
                location,
                Severity::Error,
                "Def/Syntax",
                format!("first `DEF_TYPE` argument must be a string literal, found `{}`", args[0]),
            );
            return;
        };

        let mut args = args.into_iter().skip(1);
        let mut next = || args.next().unwrap_or_default();
        let row = NodeTypeDef {
            raw_type,
            semantic_type: next(),
            name_extraction: next(),
            native_extraction: next(),
            flags: next(),
            brief,
            group: self.current_group.map(|idx| self.doc.groups[idx].name.clone()),
            location,
        };

        match self.current_group {
            Some(idx) => self.doc.groups[idx].node_types.push(row),
            None => self.doc.ungrouped.push(row),
        }
    }

    fn file_block(&mut self, text: &str) {
        let lines: Vec<&str> = text.lines().collect();
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            if let Some(rest) = line.strip_prefix("@brief") {
                let mut brief = vec![rest.trim()];
                i += 1;
                // Wrapped lines keep their line breaks and indentation.
                while i < lines.len() && !lines[i].trim().is_empty() && !lines[i].starts_with('@') {
                    brief.push(lines[i]);
                    i += 1;
                }
                self.doc.file_brief = brief.join("\n").trim().to_string();
                continue;
            }
            if let Some(rest) = line.strip_prefix("@details") {
                let mut details = vec![rest.trim()];
                i += 1;
                while i < lines.len() && !lines[i].starts_with('@') && !lines[i].starts_with("##") {
                    details.push(lines[i]);
                    i += 1;
                }
                self.doc.file_details = details.join("\n").trim().to_string();
                continue;
            }
            if CHARACTERISTICS_RE.is_match(line) {
                let mut body = Vec::new();
                i += 1;
                while i < lines.len() && !lines[i].starts_with("@see") {
                    body.push(lines[i]);
                    i += 1;
                }
                self.doc.characteristics = body.join("\n").trim().to_string();
                continue;
            }
            i += 1;
        }
    }
}

/// The `@brief` paragraph of a doc block: the tag line plus following lines
/// up to a blank line or another tag, joined with spaces.
fn brief_paragraph(text: &str) -> Option<String> {
    let mut lines = text.lines().skip_while(|l| !l.contains("@brief"));
    let first = lines.next()?;
    let mut parts = vec![first.split_once("@brief").map(|(_, r)| r.trim()).unwrap_or("")];
    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with('@') {
            break;
        }
        parts.push(line);
    }
    Some(parts.join(" ").trim().to_string())
}

#[cfg(test)]
mod tests {
    use crate::def_file::parse_def_source;
    use crate::diagnostic::Severity;

    const SAMPLE: &str = r#"/**
 * @file sample_types.def
 * @brief Sample node type definitions
 *        for tests
 *
 * @details Each row maps a grammar node type
 * to a semantic type.
 *
 * ## Sample Language Characteristics
 * - Objects and arrays
 *   - nested freely
 *
 * @see semantic_types.hpp
 */

/**
 * @defgroup sample_objects Object Structure
 * @brief Objects and their members
 *
 * Objects hold key/value pairs.
 * Keys are strings.
 * @{
 */

/// @brief JSON object literal
DEF_TYPE("object", LITERAL_STRUCTURED, NONE, NONE, ASTNodeFlags::IS_CONSTRUCT)

/**
 * @brief Key-value pair
 *        inside an object
 */
DEF_TYPE("pair", DEFINITION_VARIABLE, FIND_PROPERTY, NONE, 0)

DEF_TYPE("bare", LITERAL_STRING, NONE, NONE, 0)

/** @} */ // end of sample_objects

/// @brief Outside any group
DEF_TYPE("\"", PARSER_DELIMITER, NONE, NONE, 0)
"#;

    #[test]
    fn file_block_fields() {
        let doc = parse_def_source("sample_types.def", SAMPLE).doc;
        assert_eq!(doc.file_brief, "Sample node type definitions\n       for tests");
        assert_eq!(
            doc.file_details,
            "Each row maps a grammar node type\nto a semantic type."
        );
        assert_eq!(doc.characteristics, "- Objects and arrays\n  - nested freely");
    }

    #[test]
    fn groups_and_rows() {
        let parsed = parse_def_source("sample_types.def", SAMPLE);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let doc = parsed.doc;
        assert_eq!(doc.groups.len(), 1);
        let group = &doc.groups[0];
        assert_eq!(group.name, "sample_objects");
        assert_eq!(group.title, "Object Structure");
        assert_eq!(group.brief, "Objects and their members");
        assert_eq!(group.description, "Objects hold key/value pairs. Keys are strings.");
        assert_eq!(group.node_types.len(), 3);

        let object = &group.node_types[0];
        assert_eq!(object.raw_type, "object");
        assert_eq!(object.semantic_type, "LITERAL_STRUCTURED");
        assert_eq!(object.flags, "ASTNodeFlags::IS_CONSTRUCT");
        assert_eq!(object.brief.as_deref(), Some("JSON object literal"));
        assert_eq!(object.group.as_deref(), Some("sample_objects"));

        let pair = &group.node_types[1];
        assert_eq!(pair.name_extraction, "FIND_PROPERTY");
        assert_eq!(pair.brief.as_deref(), Some("Key-value pair inside an object"));

        // A brief is consumed by exactly one row.
        assert_eq!(group.node_types[2].brief, None);

        assert_eq!(doc.ungrouped.len(), 1);
        assert_eq!(doc.ungrouped[0].raw_type, "\"");
        assert_eq!(doc.ungrouped[0].group, None);
        assert_eq!(doc.ungrouped[0].brief.as_deref(), Some("Outside any group"));
    }

    #[test]
    fn group_brief_does_not_leak_into_first_row() {
        let parsed = parse_def_source(
            "t_types.def",
            "/** @defgroup g Title\n * @brief Group brief\n * @{ */\nDEF_TYPE(\"a\", LITERAL_STRING, NONE, NONE, 0)\n/** @} */\n",
        );
        assert_eq!(parsed.doc.groups[0].node_types[0].brief, None);
    }

    #[test]
    fn malformed_rows_are_reported_and_skipped() {
        let parsed = parse_def_source(
            "t_types.def",
            "DEF_TYPE(\"a\", LITERAL_STRING, NONE)\nDEF_TYPE(a, LITERAL_STRING, NONE, NONE, 0)\nDEF_TYPE(\"ok\", LITERAL_STRING, NONE, NONE, 0)\nDEF_TYPE(\"b\", X",
        );
        let checks: Vec<(&str, usize)> = parsed
            .diagnostics
            .iter()
            .map(|d| (d.check_name.as_str(), d.location.line))
            .collect();
        assert_eq!(
            checks,
            vec![("Def/Syntax", 1), ("Def/Syntax", 2), ("Def/Syntax", 4)]
        );
        assert!(parsed.diagnostics.iter().all(|d| d.severity == Severity::Error));
        assert_eq!(parsed.doc.ungrouped.len(), 1);
        assert_eq!(parsed.doc.ungrouped[0].raw_type, "ok");
    }

    #[test]
    fn unclosed_groups_warn() {
        let parsed = parse_def_source(
            "t_types.def",
            "/** @defgroup a First\n * @{ */\n/** @defgroup b Second\n * @{ */\nDEF_TYPE(\"x\", LITERAL_STRING, NONE, NONE, 0)\n",
        );
        let names: Vec<&str> = parsed.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].contains("`a`"));
        assert!(names[1].contains("`b`"));
        assert!(parsed
            .diagnostics
            .iter()
            .all(|d| d.check_name == "Def/UnclosedGroup" && d.severity == Severity::Warning));
        assert_eq!(parsed.doc.groups[1].node_types.len(), 1);
    }

    #[test]
    fn line_comment_briefs_continue() {
        let parsed = parse_def_source(
            "t_types.def",
            "/// @brief First part\n/// second part\nDEF_TYPE(\"x\", LITERAL_STRING, NONE, NONE, 0)\n",
        );
        assert_eq!(
            parsed.doc.ungrouped[0].brief.as_deref(),
            Some("First part second part")
        );
    }
}
