//! Semantic type expressions as written in `.def` rows.
//!
//! `LITERAL_STRING`, `ASTSemanticType::DEFINITION_MODULE`,
//! `LITERAL_STRUCTURED | SemanticRefinements::Structured::MAPPING` and raw
//! codes such as `0x7E` are all accepted.

use std::fmt;

use super::{SemanticType, refinement, type_code};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    UnknownType(String),
    MissingBase,
    MultipleBases(String),
    UnknownRefinement(String),
    MultipleRefinements(String),
    NotApplicable {
        refinement: String,
        base: SemanticType,
    },
}

impl ExprError {
    /// Refinement problems are reported separately from unknown base types.
    pub fn is_refinement_error(&self) -> bool {
        matches!(
            self,
            ExprError::UnknownRefinement(_)
                | ExprError::MultipleRefinements(_)
                | ExprError::NotApplicable { .. }
        )
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::UnknownType(t) => write!(f, "unknown semantic type `{t}`"),
            ExprError::MissingBase => f.write_str("no base semantic type in expression"),
            ExprError::MultipleBases(t) => write!(f, "second base semantic type `{t}`"),
            ExprError::UnknownRefinement(r) => write!(f, "unknown refinement `{r}`"),
            ExprError::MultipleRefinements(r) => write!(f, "second refinement `{r}`"),
            ExprError::NotApplicable { refinement, base } => {
                write!(f, "refinement `{refinement}` does not apply to `{base}`")
            }
        }
    }
}

impl std::error::Error for ExprError {}

fn strip_parens(s: &str) -> &str {
    let mut s = s.trim();
    while let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        s = inner.trim();
    }
    s
}

fn parse_numeric(term: &str) -> Option<u8> {
    if let Some(hex) = term.strip_prefix("0x").or_else(|| term.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else if !term.is_empty() && term.bytes().all(|b| b.is_ascii_digit()) {
        term.parse().ok()
    } else {
        None
    }
}

pub fn parse_semantic_expr(expr: &str) -> Result<SemanticType, ExprError> {
    let mut base: Option<SemanticType> = None;
    let mut refine: Option<refinement::Refinement> = None;

    for term in strip_parens(expr).split('|') {
        let term = strip_parens(term);
        let bare = term
            .strip_prefix("ASTSemanticType::")
            .or_else(|| term.strip_prefix("SemanticTypes::"))
            .unwrap_or(term);

        let found = type_code(bare).or_else(|| parse_numeric(bare).map(SemanticType::from_code));
        if let Some(t) = found {
            if base.is_some() {
                return Err(ExprError::MultipleBases(term.to_string()));
            }
            base = Some(t);
            continue;
        }

        if bare.contains("::") {
            let Some(r) = refinement::parse_path(bare) else {
                return Err(ExprError::UnknownRefinement(term.to_string()));
            };
            if refine.is_some() {
                return Err(ExprError::MultipleRefinements(term.to_string()));
            }
            refine = Some(r);
            continue;
        }

        return Err(ExprError::UnknownType(term.to_string()));
    }

    let base = base.ok_or(ExprError::MissingBase)?;
    match refine {
        None => Ok(base),
        Some(r) => {
            let applies = refinement::group(r.group).is_some_and(|g| g.applies_to.accepts(base));
            if !applies {
                return Err(ExprError::NotApplicable {
                    refinement: format!("{}::{}", r.group, r.name),
                    base: base.base(),
                });
            }
            Ok(base.with_refinement(r.bits))
        }
    }
}
