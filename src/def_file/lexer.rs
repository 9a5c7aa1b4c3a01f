//! `.def` file lexer.
//!
//! Extracts the three things the parser cares about from a C preprocessor
//! include file: Doxygen block comments (`/** ... */`), Doxygen line comments
//! (`/// ...`), and `DEF_TYPE(...)` invocations. Everything else (plain
//! comments, preprocessor lines, stray code) is skipped.

use crate::diagnostic::Location;
use crate::syntax::source::{compute_line_starts, offset_to_line_col};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Body of a `/** */` comment with the leading ` * ` decoration removed.
    DocBlock(String),
    /// Text after `///`, trimmed.
    DocLine(String),
    /// Arguments of `DEF_TYPE(...)`, split on top-level commas and trimmed.
    DefType(Vec<String>),
    /// `DEF_TYPE(` with no closing parenthesis; carries the text consumed.
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub location: Location,
}

pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line_starts: Vec<usize>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let input = input.as_bytes();
        Self {
            input,
            pos: 0,
            line_starts: compute_line_starts(input),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied()?;
        self.pos += 1;
        Some(ch)
    }

    fn starts_with(&self, s: &[u8]) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn location(&self, offset: usize) -> Location {
        let (line, column) = offset_to_line_col(self.input, &self.line_starts, offset);
        Location { line, column }
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn skip_to_line_end(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    /// True when only whitespace precedes `pos` on its line.
    fn at_line_start(&self) -> bool {
        self.input[..self.pos]
            .iter()
            .rev()
            .take_while(|&&b| b != b'\n')
            .all(|b| b.is_ascii_whitespace())
    }

    /// Skip a `"..."` or `'...'` literal starting at `pos`. Returns false if
    /// the literal runs to end of line or file.
    fn skip_quoted(&mut self) -> bool {
        let Some(quote) = self.advance() else {
            return false;
        };
        while let Some(ch) = self.advance() {
            match ch {
                b'\\' => {
                    self.advance();
                }
                b'\n' => return false,
                c if c == quote => return true,
                _ => {}
            }
        }
        false
    }

    fn skip_preprocessor_line(&mut self) {
        loop {
            self.skip_to_line_end();
            let continued = self.pos > 0 && self.input[self.pos - 1] == b'\\';
            if continued && self.advance().is_some() {
                continue;
            }
            break;
        }
    }

    fn lex_block_comment(&mut self) -> Option<Token> {
        let is_doc = self.starts_with(b"/**") && !self.starts_with(b"/**/");
        self.pos += 2;
        let body_start = if is_doc { self.pos + 1 } else { self.pos };
        let body_end;
        loop {
            if self.peek().is_none() {
                body_end = self.pos;
                break;
            }
            if self.starts_with(b"*/") {
                body_end = self.pos;
                self.pos += 2;
                break;
            }
            self.pos += 1;
        }
        if !is_doc {
            return None;
        }
        let body = self.text(body_start.min(body_end), body_end);
        Some(Token::DocBlock(clean_doc_block(&body)))
    }

    fn lex_line_comment(&mut self) -> Option<Token> {
        let is_doc = self.starts_with(b"///") && self.peek_at(3) != Some(b'/');
        let start = self.pos + 3;
        self.skip_to_line_end();
        if !is_doc {
            return None;
        }
        Some(Token::DocLine(self.text(start, self.pos).trim().to_string()))
    }

    /// Lex the argument list following `DEF_TYPE`. Returns None when the name
    /// is not followed by `(` (e.g. `#undef DEF_TYPE` or a bare mention).
    fn lex_call(&mut self) -> Option<Token> {
        let name_end = self.pos;
        self.skip_whitespace();
        if self.peek() != Some(b'(') {
            self.pos = name_end;
            return None;
        }
        self.advance();

        let mut args = Vec::new();
        let mut arg_start = self.pos;
        let mut depth = 0usize;
        loop {
            let Some(ch) = self.peek() else {
                return Some(Token::Malformed(self.text(name_end, self.pos)));
            };
            match ch {
                b'"' | b'\'' => {
                    if !self.skip_quoted() {
                        self.skip_to_line_end();
                        return Some(Token::Malformed(self.text(name_end, self.pos)));
                    }
                }
                b'(' => {
                    depth += 1;
                    self.pos += 1;
                }
                b')' if depth == 0 => {
                    args.push(self.text(arg_start, self.pos).trim().to_string());
                    self.pos += 1;
                    return Some(Token::DefType(args));
                }
                b')' => {
                    depth -= 1;
                    self.pos += 1;
                }
                b',' if depth == 0 => {
                    args.push(self.text(arg_start, self.pos).trim().to_string());
                    self.pos += 1;
                    arg_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }
    }

    pub fn tokenize(&mut self) -> Vec<Spanned> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(ch) = self.peek() else { break };

            let token = match ch {
                b'/' if self.peek_at(1) == Some(b'*') => self.lex_block_comment(),
                b'/' if self.peek_at(1) == Some(b'/') => self.lex_line_comment(),
                b'#' if self.at_line_start() => {
                    self.skip_preprocessor_line();
                    None
                }
                b'"' | b'\'' => {
                    if !self.skip_quoted() {
                        self.skip_to_line_end();
                    }
                    None
                }
                c if c.is_ascii_alphabetic() || c == b'_' => {
                    while let Some(c) = self.peek() {
                        if c.is_ascii_alphanumeric() || c == b'_' {
                            self.pos += 1;
                        } else {
                            break;
                        }
                    }
                    if &self.input[start..self.pos] == b"DEF_TYPE" {
                        self.lex_call()
                    } else {
                        None
                    }
                }
                _ => {
                    self.advance();
                    None
                }
            };

            if let Some(token) = token {
                tokens.push(Spanned {
                    token,
                    location: self.location(start),
                });
            }
        }

        tokens
    }
}

/// Strip the ` * ` decoration Doxygen block comments carry on each line.
pub fn clean_doc_block(body: &str) -> String {
    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => trimmed,
            }
        })
        .map(str::trim_end)
        .collect();
    lines.join("\n").trim().to_string()
}

/// Decode a C string literal (`"..."`) into its value. Returns None if `arg`
/// is not a single complete literal.
pub fn decode_string_literal(arg: &str) -> Option<String> {
    let inner = arg.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                other => out.push(other),
            },
            // An unescaped quote means two adjacent literals or garbage.
            '"' => return None,
            other => out.push(other),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn def_type_arguments() {
        let tokens = lex(r#"DEF_TYPE("pair", DEFINITION_VARIABLE, FIND_PROPERTY, NONE, 0)"#);
        assert_eq!(
            tokens,
            vec![Token::DefType(vec![
                "\"pair\"".into(),
                "DEFINITION_VARIABLE".into(),
                "FIND_PROPERTY".into(),
                "NONE".into(),
                "0".into(),
            ])]
        );
    }

    #[test]
    fn punctuation_literals_do_not_split() {
        let tokens = lex(r#"DEF_TYPE(",", PARSER_PUNCTUATION, NONE, NONE, 0)
DEF_TYPE(")", PARSER_DELIMITER, NONE, NONE, 0)"#);
        assert_eq!(tokens.len(), 2);
        match &tokens[0] {
            Token::DefType(args) => assert_eq!(args[0], "\",\""),
            other => panic!("unexpected {other:?}"),
        }
        match &tokens[1] {
            Token::DefType(args) => {
                assert_eq!(args.len(), 5);
                assert_eq!(args[0], "\")\"");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nested_parens_and_or_expressions() {
        let tokens = lex(
            "DEF_TYPE(\"x\", (LITERAL_STRUCTURED | SemanticRefinements::Structured::MAPPING), NONE, NONE, (IS_CONSTRUCT | IS_EMBODIED))",
        );
        match &tokens[0] {
            Token::DefType(args) => {
                assert_eq!(args.len(), 5);
                assert_eq!(args[4], "(IS_CONSTRUCT | IS_EMBODIED)");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn doc_comments() {
        let tokens = lex("/**\n * @brief Hello\n *   indented\n */\n/// @brief Line\n// plain\n/* plain */\n/**/");
        assert_eq!(
            tokens,
            vec![
                Token::DocBlock("@brief Hello\n  indented".into()),
                Token::DocLine("@brief Line".into()),
            ]
        );
    }

    #[test]
    fn single_line_doc_block() {
        assert_eq!(lex("/** @} */"), vec![Token::DocBlock("@}".into())]);
    }

    #[test]
    fn skips_preprocessor_and_mentions() {
        let tokens = lex("#ifndef DEF_TYPE\n#define DEF_TYPE(a, b, \\\n c, d, e)\n#endif\nint DEF_TYPE;\n");
        assert!(tokens.is_empty());
    }

    #[test]
    fn unterminated_call() {
        let tokens = lex("DEF_TYPE(\"a\", LITERAL_STRING, NONE");
        assert!(matches!(tokens[0], Token::Malformed(_)));
    }

    #[test]
    fn locations_are_recorded() {
        let spans = Lexer::new("\n\n  DEF_TYPE(\"a\", X, NONE, NONE, 0)").tokenize();
        assert_eq!(spans[0].location, Location { line: 3, column: 2 });
    }

    #[test]
    fn decode_literals() {
        assert_eq!(decode_string_literal("\"pair\""), Some("pair".into()));
        assert_eq!(decode_string_literal(r#""\"""#), Some("\"".into()));
        assert_eq!(decode_string_literal(r#""\\""#), Some("\\".into()));
        assert_eq!(decode_string_literal("pair"), None);
        assert_eq!(decode_string_literal("\"a\" \"b\""), None);
    }
}
