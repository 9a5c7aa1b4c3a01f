//! Concrete syntax tree parser for JSON.
//!
//! Emits the node kinds of tree-sitter-json: `document`, `object`, `pair`,
//! `array`, `string`, `string_content`, `escape_sequence`, `number`, `true`,
//! `false`, `null`, `comment` (named) and `{ } [ ] , : "` (anonymous).
//! Input that does not fit the grammar is wrapped in `ERROR` nodes and
//! parsing resumes at the next separator or closing bracket. Containers
//! nested deeper than [`MAX_NESTING`] become a single `ERROR` node.

use crate::syntax::{NodeId, SourceFile, SyntaxTree};

pub const ERROR: &str = "ERROR";

/// Deepest object/array nesting parsed into individual nodes.
pub const MAX_NESTING: usize = 256;

pub fn parse_json(source: SourceFile) -> SyntaxTree {
    let text = source.content.clone().into_bytes();
    let mut parser = JsonParser {
        src: &text,
        pos: 0,
        depth: 0,
        tree: SyntaxTree::new(source),
    };
    parser.document();
    parser.tree
}

struct JsonParser<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
    tree: SyntaxTree,
}

fn starts_value(ch: u8) -> bool {
    matches!(ch, b'{' | b'[' | b'"' | b'-') || ch.is_ascii_alphanumeric()
}

impl JsonParser<'_> {
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    /// Advance over one UTF-8 encoded character.
    fn advance_char(&mut self) {
        let Some(lead) = self.peek() else { return };
        let len = match lead {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        self.pos = (self.pos + len).min(self.src.len());
    }

    fn token(&mut self, kind: &'static str, len: usize, parent: NodeId) -> NodeId {
        let start = self.pos;
        self.pos += len;
        self.tree.push(kind, false, start, self.pos, Some(parent))
    }

    /// Skip whitespace; comments become `comment` children of `parent`.
    fn trivia(&mut self, parent: NodeId) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    let start = self.pos;
                    while self.peek().is_some_and(|c| c != b'\n') {
                        self.pos += 1;
                    }
                    self.tree.push("comment", true, start, self.pos, Some(parent));
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    while self.pos < self.src.len() && !self.src[self.pos..].starts_with(b"*/") {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.src.len());
                    self.tree.push("comment", true, start, self.pos, Some(parent));
                }
                _ => break,
            }
        }
    }

    /// Wrap input up to (not including) a byte matching `stop` in an `ERROR`
    /// node. Always consumes at least one character.
    fn error_until(&mut self, parent: NodeId, stop: impl Fn(u8) -> bool) -> NodeId {
        let start = self.pos;
        self.advance_char();
        while let Some(ch) = self.peek() {
            if stop(ch) {
                break;
            }
            self.advance_char();
        }
        self.tree.push(ERROR, true, start, self.pos, Some(parent))
    }

    fn document(&mut self) {
        let root = self.tree.push("document", true, 0, self.src.len(), None);
        loop {
            self.trivia(root);
            let Some(ch) = self.peek() else { break };
            if starts_value(ch) {
                self.value(root);
            } else {
                self.error_until(root, |c| c.is_ascii_whitespace() || starts_value(c));
            }
        }
    }

    fn value(&mut self, parent: NodeId) {
        match self.peek() {
            Some(b'{' | b'[') if self.depth >= MAX_NESTING => self.too_deep(parent),
            Some(b'{') => self.object(parent),
            Some(b'[') => self.array(parent),
            Some(b'"') => self.string(parent),
            Some(b'-') => self.number(parent),
            Some(c) if c.is_ascii_digit() => self.number(parent),
            Some(c) if c.is_ascii_alphabetic() => self.word(parent),
            _ => {
                self.error_until(parent, |c| matches!(c, b',' | b'}' | b']'));
            }
        }
    }

    /// Consume one balanced container without building nodes for its
    /// contents and wrap it in an `ERROR` node.
    fn too_deep(&mut self, parent: NodeId) {
        let start = self.pos;
        let mut open = 0usize;
        let mut in_string = false;
        while let Some(ch) = self.peek() {
            self.pos += 1;
            if in_string {
                match ch {
                    b'\\' => self.pos = (self.pos + 1).min(self.src.len()),
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                b'"' => in_string = true,
                b'{' | b'[' => open += 1,
                b'}' | b']' => {
                    open -= 1;
                    if open == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        // Never stop inside a multi-byte character.
        while self.pos < self.src.len() && (self.src[self.pos] & 0xC0) == 0x80 {
            self.pos += 1;
        }
        self.tree.push(ERROR, true, start, self.pos, Some(parent));
    }

    fn word(&mut self, parent: NodeId) {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        let kind = match &self.src[start..self.pos] {
            b"true" => "true",
            b"false" => "false",
            b"null" => "null",
            _ => ERROR,
        };
        self.tree.push(kind, true, start, self.pos, Some(parent));
    }

    fn number(&mut self, parent: NodeId) {
        let start = self.pos;
        let digits = |p: &mut Self| {
            let from = p.pos;
            while p.peek().is_some_and(|c| c.is_ascii_digit()) {
                p.pos += 1;
            }
            p.pos > from
        };
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let mut valid = digits(self);
        if valid && self.peek() == Some(b'.') {
            self.pos += 1;
            valid = digits(self);
        }
        if valid && matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            valid = digits(self);
        }
        let kind = if valid { "number" } else { ERROR };
        self.tree.push(kind, true, start, self.pos, Some(parent));
    }

    fn string(&mut self, parent: NodeId) {
        let node = self.tree.push("string", true, self.pos, self.pos, Some(parent));
        self.token("\"", 1, node);
        loop {
            match self.peek() {
                Some(b'"') => {
                    self.token("\"", 1, node);
                    break;
                }
                Some(b'\\') => {
                    let start = self.pos;
                    self.pos += 1;
                    if self.peek() == Some(b'u') {
                        self.pos += 1;
                        let mut n = 0;
                        while n < 4 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                            self.pos += 1;
                            n += 1;
                        }
                    } else if self.peek().is_some_and(|c| c != b'\n') {
                        self.advance_char();
                    }
                    self.tree.push("escape_sequence", true, start, self.pos, Some(node));
                }
                None | Some(b'\n') => {
                    // Unterminated: the string runs to end of line.
                    self.tree.retag(node, ERROR, true);
                    break;
                }
                Some(_) => {
                    let start = self.pos;
                    while self.peek().is_some_and(|c| !matches!(c, b'"' | b'\\' | b'\n')) {
                        self.advance_char();
                    }
                    self.tree.push("string_content", true, start, self.pos, Some(node));
                }
            }
        }
        self.tree.set_end(node, self.pos);
    }

    fn object(&mut self, parent: NodeId) {
        let node = self.tree.push("object", true, self.pos, self.pos, Some(parent));
        self.depth += 1;
        self.token("{", 1, node);
        loop {
            self.trivia(node);
            match self.peek() {
                None => break,
                Some(b'}') => {
                    self.token("}", 1, node);
                    break;
                }
                Some(b',') => {
                    self.error_until(node, |c| c != b',');
                }
                Some(c) if c == b'"' || c == b'-' || c.is_ascii_digit() => {
                    self.pair(node);
                    self.trivia(node);
                    match self.peek() {
                        Some(b',') => {
                            self.token(",", 1, node);
                        }
                        Some(b'}') | None => {}
                        Some(_) => {
                            self.error_until(node, |c| matches!(c, b',' | b'}'));
                            if self.peek() == Some(b',') {
                                self.token(",", 1, node);
                            }
                        }
                    }
                }
                Some(_) => {
                    self.error_until(node, |c| matches!(c, b',' | b'}' | b'"'));
                }
            }
        }
        self.depth -= 1;
        self.tree.set_end(node, self.pos);
    }

    fn pair(&mut self, parent: NodeId) {
        let node = self.tree.push("pair", true, self.pos, self.pos, Some(parent));
        if self.peek() == Some(b'"') {
            self.string(node);
        } else {
            self.number(node);
        }
        self.trivia(node);
        if self.peek() == Some(b':') {
            self.token(":", 1, node);
            self.trivia(node);
            match self.peek() {
                Some(c) if starts_value(c) => self.value(node),
                _ => self.tree.retag(node, ERROR, true),
            }
        } else {
            self.tree.retag(node, ERROR, true);
        }
        self.tree.set_end(node, self.pos);
    }

    fn array(&mut self, parent: NodeId) {
        let node = self.tree.push("array", true, self.pos, self.pos, Some(parent));
        self.depth += 1;
        self.token("[", 1, node);
        loop {
            self.trivia(node);
            match self.peek() {
                None => break,
                Some(b']') => {
                    self.token("]", 1, node);
                    break;
                }
                Some(b',') => {
                    self.error_until(node, |c| c != b',');
                }
                Some(c) if starts_value(c) => {
                    self.value(node);
                    self.trivia(node);
                    match self.peek() {
                        Some(b',') => {
                            self.token(",", 1, node);
                        }
                        Some(b']') | None => {}
                        Some(_) => {
                            self.error_until(node, |c| matches!(c, b',' | b']'));
                            if self.peek() == Some(b',') {
                                self.token(",", 1, node);
                            }
                        }
                    }
                }
                Some(_) => {
                    self.error_until(node, |c| matches!(c, b',' | b']') || starts_value(c));
                }
            }
        }
        self.depth -= 1;
        self.tree.set_end(node, self.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(s: &str) -> SyntaxTree {
        parse_json(SourceFile::from_string(PathBuf::from("t.json"), s.to_string()))
    }

    /// S-expression of named nodes, like tree-sitter's `to_sexp`.
    fn sexp(tree: &SyntaxTree, id: NodeId) -> String {
        let inner: Vec<String> = tree
            .children(id)
            .iter()
            .filter(|&&c| tree.node(c).named)
            .map(|&c| sexp(tree, c))
            .collect();
        if inner.is_empty() {
            format!("({})", tree.kind(id))
        } else {
            format!("({} {})", tree.kind(id), inner.join(" "))
        }
    }

    fn kinds(tree: &SyntaxTree, id: NodeId) -> Vec<&'static str> {
        tree.children(id).iter().map(|&c| tree.kind(c)).collect()
    }

    #[test]
    fn object_with_pairs() {
        let tree = parse(r#"{"a": 1, "b": [true, null]}"#);
        assert_eq!(
            sexp(&tree, 0),
            "(document (object (pair (string (string_content)) (number)) (pair (string (string_content)) (array (true) (null)))))"
        );
        assert_eq!(kinds(&tree, 1), vec!["{", "pair", ",", "pair", "}"]);
        let pair = tree.children(1)[1];
        assert_eq!(kinds(&tree, pair), vec!["string", ":", "number"]);
        assert_eq!(tree.text(pair), "\"a\": 1");
    }

    #[test]
    fn string_pieces() {
        let tree = parse(r#""a\nb\u00e9""#);
        let string = tree.children(0)[0];
        assert_eq!(
            kinds(&tree, string),
            vec!["\"", "string_content", "escape_sequence", "string_content", "escape_sequence", "\""]
        );
        assert_eq!(tree.text(tree.children(string)[4]), "\\u00e9");
        let empty = parse("\"\"");
        assert_eq!(kinds(&empty, 1), vec!["\"", "\""]);
    }

    #[test]
    fn numbers() {
        for n in ["0", "-12", "3.25", "1e10", "-2.5E-3"] {
            let tree = parse(n);
            assert_eq!(sexp(&tree, 0), "(document (number))", "{n}");
            assert_eq!(tree.text(1), n);
        }
        assert_eq!(sexp(&parse("-"), 0), "(document (ERROR))");
        assert_eq!(sexp(&parse("1."), 0), "(document (ERROR))");
    }

    #[test]
    fn error_recovery_continues() {
        let tree = parse(r#"{"a": 1 x, "b": 2}"#);
        assert_eq!(
            sexp(&tree, 0),
            "(document (object (pair (string (string_content)) (number)) (ERROR) (pair (string (string_content)) (number))))"
        );
        let tree = parse("[1,, 2]");
        assert_eq!(sexp(&tree, 0), "(document (array (number) (ERROR) (number)))");
        let tree = parse("nope");
        assert_eq!(sexp(&tree, 0), "(document (ERROR))");
    }

    #[test]
    fn incomplete_input() {
        assert_eq!(
            sexp(&parse(r#"{"a": "#), 0),
            "(document (object (ERROR (string (string_content)))))"
        );
        assert_eq!(sexp(&parse(r#""abc"#), 0), "(document (ERROR (string_content)))");
        assert_eq!(sexp(&parse("[1"), 0), "(document (array (number)))");
    }

    #[test]
    fn comments_are_nodes() {
        let tree = parse("// top\n{\"a\": /* inline */ 1}");
        assert_eq!(
            sexp(&tree, 0),
            "(document (comment) (object (pair (string (string_content)) (comment) (number))))"
        );
    }

    #[test]
    fn non_ascii_text_stays_on_char_boundaries() {
        let tree = parse("[\"é\", ü]");
        let error = tree
            .preorder()
            .into_iter()
            .find(|&(id, _)| tree.kind(id) == ERROR)
            .map(|(id, _)| id)
            .unwrap();
        assert_eq!(tree.text(error), "ü");
    }

    #[test]
    fn deep_nesting_is_cut_off_not_overflowed() {
        let n = 100_000;
        let input = format!("{}{}", "[".repeat(n), "]".repeat(n));
        let tree = parse(&input);
        assert_eq!(tree.kind(0), "document");

        let order = tree.preorder();
        let arrays = order.iter().filter(|&&(id, _)| tree.kind(id) == "array").count();
        assert_eq!(arrays, MAX_NESTING);
        let errors: Vec<NodeId> = order
            .iter()
            .map(|&(id, _)| id)
            .filter(|&id| tree.kind(id) == ERROR)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(tree.text(errors[0]).len(), 2 * (n - MAX_NESTING));
        assert_eq!(tree.node(tree.children(0)[0]).end, input.len());
    }

    #[test]
    fn too_deep_region_skips_strings() {
        let depth = MAX_NESTING + 1;
        let input = format!("{}\"]\\\"{{\"{}", "[".repeat(depth), "]".repeat(depth));
        let tree = parse(&input);
        let errors: Vec<NodeId> = tree
            .preorder()
            .into_iter()
            .map(|(id, _)| id)
            .filter(|&id| tree.kind(id) == ERROR)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(tree.text(errors[0]).starts_with('['));
        assert!(tree.text(errors[0]).ends_with("\"]"));
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn children_nest_inside_parents(input in "[\\[\\]{}\":,a-z0-9 \\\\.-]{0,60}") {
                let tree = parse(&input);
                prop_assert_eq!(tree.kind(0), "document");
                for (id, _) in tree.preorder() {
                    let node = tree.node(id);
                    prop_assert!(node.start <= node.end);
                    prop_assert!(node.end <= input.len());
                    if let Some(p) = node.parent {
                        let parent = tree.node(p);
                        prop_assert!(parent.start <= node.start && node.end <= parent.end);
                    }
                }
            }
        }
    }
}
