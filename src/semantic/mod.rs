//! Universal 8-bit semantic type taxonomy.
//!
//! Byte layout: `[ss kk tt ll]`
//!
//! - `ss` (bits 6-7): super kind
//! - `kk` (bits 4-5): kind within the super kind
//! - `tt` (bits 2-3): super type within the kind
//! - `ll` (bits 0-1): language-specific refinement
//!
//! A semantic type's *base* is the byte with the refinement bits cleared.
//! Names always describe the base; refinements are named separately in
//! [`refinement`].

pub mod expr;
pub mod refinement;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SuperKind {
    DataStructure,
    Computation,
    ControlEffects,
    MetaExternal,
}

impl SuperKind {
    pub const ALL: [SuperKind; 4] = [
        SuperKind::DataStructure,
        SuperKind::Computation,
        SuperKind::ControlEffects,
        SuperKind::MetaExternal,
    ];

    pub fn code(self) -> u8 {
        match self {
            SuperKind::DataStructure => 0x00,
            SuperKind::Computation => 0x40,
            SuperKind::ControlEffects => 0x80,
            SuperKind::MetaExternal => 0xC0,
        }
    }

    pub fn from_code(code: u8) -> SuperKind {
        match code & 0xC0 {
            0x00 => SuperKind::DataStructure,
            0x40 => SuperKind::Computation,
            0x80 => SuperKind::ControlEffects,
            _ => SuperKind::MetaExternal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SuperKind::DataStructure => "DATA_STRUCTURE",
            SuperKind::Computation => "COMPUTATION",
            SuperKind::ControlEffects => "CONTROL_EFFECTS",
            SuperKind::MetaExternal => "META_EXTERNAL",
        }
    }
}

impl fmt::Display for SuperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Literal,
    Name,
    Pattern,
    Type,
    Operator,
    ComputationNode,
    Transform,
    Definition,
    Execution,
    FlowControl,
    ErrorHandling,
    Organization,
    Metadata,
    External,
    ParserSpecific,
    Reserved,
}

impl Kind {
    pub const ALL: [Kind; 16] = [
        Kind::Literal,
        Kind::Name,
        Kind::Pattern,
        Kind::Type,
        Kind::Operator,
        Kind::ComputationNode,
        Kind::Transform,
        Kind::Definition,
        Kind::Execution,
        Kind::FlowControl,
        Kind::ErrorHandling,
        Kind::Organization,
        Kind::Metadata,
        Kind::External,
        Kind::ParserSpecific,
        Kind::Reserved,
    ];

    /// Full kind value (bits 4-7).
    pub fn code(self) -> u8 {
        (self as u8) << 4
    }

    pub fn from_code(code: u8) -> Kind {
        Kind::ALL[(code >> 4) as usize]
    }

    pub fn super_kind(self) -> SuperKind {
        SuperKind::from_code(self.code())
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Literal => "LITERAL",
            Kind::Name => "NAME",
            Kind::Pattern => "PATTERN",
            Kind::Type => "TYPE",
            Kind::Operator => "OPERATOR",
            Kind::ComputationNode => "COMPUTATION_NODE",
            Kind::Transform => "TRANSFORM",
            Kind::Definition => "DEFINITION",
            Kind::Execution => "EXECUTION",
            Kind::FlowControl => "FLOW_CONTROL",
            Kind::ErrorHandling => "ERROR_HANDLING",
            Kind::Organization => "ORGANIZATION",
            Kind::Metadata => "METADATA",
            Kind::External => "EXTERNAL",
            Kind::ParserSpecific => "PARSER_SPECIFIC",
            Kind::Reserved => "RESERVED",
        }
    }

    /// The four base semantic types belonging to this kind.
    pub fn types(self) -> [SemanticType; 4] {
        let base = self.code();
        [
            SemanticType(base),
            SemanticType(base | 0x04),
            SemanticType(base | 0x08),
            SemanticType(base | 0x0C),
        ]
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One semantic type byte, possibly carrying a refinement in bits 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SemanticType(u8);

// Indexed by `code >> 2`.
const BASE_NAMES: [&str; 64] = [
    "LITERAL_NUMBER",
    "LITERAL_STRING",
    "LITERAL_ATOMIC",
    "LITERAL_STRUCTURED",
    "NAME_KEYWORD",
    "NAME_IDENTIFIER",
    "NAME_QUALIFIED",
    "NAME_SCOPED",
    "PATTERN_DESTRUCTURE",
    "PATTERN_MATCH",
    "PATTERN_TEMPLATE",
    "PATTERN_GUARD",
    "TYPE_PRIMITIVE",
    "TYPE_COMPOSITE",
    "TYPE_REFERENCE",
    "TYPE_GENERIC",
    "OPERATOR_ARITHMETIC",
    "OPERATOR_LOGICAL",
    "OPERATOR_COMPARISON",
    "OPERATOR_ASSIGNMENT",
    "COMPUTATION_CALL",
    "COMPUTATION_ACCESS",
    "COMPUTATION_EXPRESSION",
    "COMPUTATION_LAMBDA",
    "TRANSFORM_QUERY",
    "TRANSFORM_ITERATION",
    "TRANSFORM_PROJECTION",
    "TRANSFORM_AGGREGATION",
    "DEFINITION_FUNCTION",
    "DEFINITION_VARIABLE",
    "DEFINITION_CLASS",
    "DEFINITION_MODULE",
    "EXECUTION_STATEMENT",
    "EXECUTION_DECLARATION",
    "EXECUTION_INVOCATION",
    "EXECUTION_MUTATION",
    "FLOW_CONDITIONAL",
    "FLOW_LOOP",
    "FLOW_JUMP",
    "FLOW_SYNC",
    "ERROR_TRY",
    "ERROR_CATCH",
    "ERROR_THROW",
    "ERROR_FINALLY",
    "ORGANIZATION_BLOCK",
    "ORGANIZATION_LIST",
    "ORGANIZATION_SECTION",
    "ORGANIZATION_CONTAINER",
    "METADATA_COMMENT",
    "METADATA_ANNOTATION",
    "METADATA_DIRECTIVE",
    "METADATA_DEBUG",
    "EXTERNAL_IMPORT",
    "EXTERNAL_EXPORT",
    "EXTERNAL_FOREIGN",
    "EXTERNAL_EMBED",
    "PARSER_PUNCTUATION",
    "PARSER_DELIMITER",
    "PARSER_SYNTAX",
    "PARSER_CONSTRUCT",
    "RESERVED_FUTURE1",
    "RESERVED_FUTURE2",
    "RESERVED_FUTURE3",
    "RESERVED_FUTURE4",
];

// One-line summaries, same indexing as BASE_NAMES.
const BASE_SUMMARIES: [&str; 64] = [
    "integers, floats, decimals",
    "strings, chars, text",
    "true, false, null, None, undefined",
    "arrays, objects, composite literals",
    "language keywords",
    "simple identifiers",
    "qualified names (obj.prop)",
    "scoped references (::, this, super)",
    "destructuring patterns",
    "pattern matching constructs",
    "template patterns",
    "guards and conditions",
    "basic types (int, string, etc)",
    "structs, unions, tuples",
    "pointers, references",
    "generic/template types",
    "+, -, *, /, %, bitwise and shift operators",
    "&&, ||, !, and, or, not, ? :",
    "==, !=, <, >, <=, >=, is, in",
    "=, +=, -=, :=, etc.",
    "function calls",
    "member access, indexing",
    "complex expressions",
    "lambdas, anonymous functions",
    "SQL queries, LINQ",
    "map, filter, reduce",
    "select, extract operations",
    "group by, aggregate operations",
    "function definitions",
    "variable/constant definitions",
    "class/struct definitions",
    "modules, namespaces",
    "expression statements",
    "variable declarations",
    "function/method calls",
    "assignments, scope modifications",
    "if, switch, match",
    "for, while, do-while",
    "break, continue, return, goto",
    "async, await, synchronized, yield",
    "try blocks",
    "catch, except blocks",
    "throw, raise statements",
    "finally, ensure blocks",
    "code blocks, scopes",
    "argument lists, parameter lists",
    "sections, regions",
    "files, modules, packages",
    "comments, documentation",
    "decorators, attributes",
    "preprocessor directives",
    "debug information, source maps",
    "import statements",
    "export statements",
    "foreign function interface",
    "embedded content (HTML, CSS, SQL)",
    "language-specific punctuation",
    "delimiters, separators",
    "syntax elements",
    "unique language constructs",
    "reserved for future use",
    "reserved for future use",
    "reserved for future use",
    "reserved for future use",
];

pub const LITERAL_NUMBER: SemanticType = SemanticType(0x00);
pub const LITERAL_STRING: SemanticType = SemanticType(0x04);
pub const LITERAL_ATOMIC: SemanticType = SemanticType(0x08);
pub const LITERAL_STRUCTURED: SemanticType = SemanticType(0x0C);

pub const NAME_KEYWORD: SemanticType = SemanticType(0x10);
pub const NAME_IDENTIFIER: SemanticType = SemanticType(0x14);
pub const NAME_QUALIFIED: SemanticType = SemanticType(0x18);
pub const NAME_SCOPED: SemanticType = SemanticType(0x1C);

pub const PATTERN_DESTRUCTURE: SemanticType = SemanticType(0x20);
pub const PATTERN_MATCH: SemanticType = SemanticType(0x24);
pub const PATTERN_TEMPLATE: SemanticType = SemanticType(0x28);
pub const PATTERN_GUARD: SemanticType = SemanticType(0x2C);

pub const TYPE_PRIMITIVE: SemanticType = SemanticType(0x30);
pub const TYPE_COMPOSITE: SemanticType = SemanticType(0x34);
pub const TYPE_REFERENCE: SemanticType = SemanticType(0x38);
pub const TYPE_GENERIC: SemanticType = SemanticType(0x3C);

pub const OPERATOR_ARITHMETIC: SemanticType = SemanticType(0x40);
pub const OPERATOR_LOGICAL: SemanticType = SemanticType(0x44);
pub const OPERATOR_COMPARISON: SemanticType = SemanticType(0x48);
pub const OPERATOR_ASSIGNMENT: SemanticType = SemanticType(0x4C);

pub const COMPUTATION_CALL: SemanticType = SemanticType(0x50);
pub const COMPUTATION_ACCESS: SemanticType = SemanticType(0x54);
pub const COMPUTATION_EXPRESSION: SemanticType = SemanticType(0x58);
pub const COMPUTATION_LAMBDA: SemanticType = SemanticType(0x5C);

pub const TRANSFORM_QUERY: SemanticType = SemanticType(0x60);
pub const TRANSFORM_ITERATION: SemanticType = SemanticType(0x64);
pub const TRANSFORM_PROJECTION: SemanticType = SemanticType(0x68);
pub const TRANSFORM_AGGREGATION: SemanticType = SemanticType(0x6C);

pub const DEFINITION_FUNCTION: SemanticType = SemanticType(0x70);
pub const DEFINITION_VARIABLE: SemanticType = SemanticType(0x74);
pub const DEFINITION_CLASS: SemanticType = SemanticType(0x78);
pub const DEFINITION_MODULE: SemanticType = SemanticType(0x7C);

pub const EXECUTION_STATEMENT: SemanticType = SemanticType(0x80);
pub const EXECUTION_DECLARATION: SemanticType = SemanticType(0x84);
pub const EXECUTION_INVOCATION: SemanticType = SemanticType(0x88);
pub const EXECUTION_MUTATION: SemanticType = SemanticType(0x8C);

pub const FLOW_CONDITIONAL: SemanticType = SemanticType(0x90);
pub const FLOW_LOOP: SemanticType = SemanticType(0x94);
pub const FLOW_JUMP: SemanticType = SemanticType(0x98);
pub const FLOW_SYNC: SemanticType = SemanticType(0x9C);

pub const ERROR_TRY: SemanticType = SemanticType(0xA0);
pub const ERROR_CATCH: SemanticType = SemanticType(0xA4);
pub const ERROR_THROW: SemanticType = SemanticType(0xA8);
pub const ERROR_FINALLY: SemanticType = SemanticType(0xAC);

pub const ORGANIZATION_BLOCK: SemanticType = SemanticType(0xB0);
pub const ORGANIZATION_LIST: SemanticType = SemanticType(0xB4);
pub const ORGANIZATION_SECTION: SemanticType = SemanticType(0xB8);
pub const ORGANIZATION_CONTAINER: SemanticType = SemanticType(0xBC);

pub const METADATA_COMMENT: SemanticType = SemanticType(0xC0);
pub const METADATA_ANNOTATION: SemanticType = SemanticType(0xC4);
pub const METADATA_DIRECTIVE: SemanticType = SemanticType(0xC8);
pub const METADATA_DEBUG: SemanticType = SemanticType(0xCC);

pub const EXTERNAL_IMPORT: SemanticType = SemanticType(0xD0);
pub const EXTERNAL_EXPORT: SemanticType = SemanticType(0xD4);
pub const EXTERNAL_FOREIGN: SemanticType = SemanticType(0xD8);
pub const EXTERNAL_EMBED: SemanticType = SemanticType(0xDC);

pub const PARSER_PUNCTUATION: SemanticType = SemanticType(0xE0);
pub const PARSER_DELIMITER: SemanticType = SemanticType(0xE4);
pub const PARSER_SYNTAX: SemanticType = SemanticType(0xE8);
pub const PARSER_CONSTRUCT: SemanticType = SemanticType(0xEC);

pub const RESERVED_FUTURE1: SemanticType = SemanticType(0xF0);
pub const RESERVED_FUTURE2: SemanticType = SemanticType(0xF4);
pub const RESERVED_FUTURE3: SemanticType = SemanticType(0xF8);
pub const RESERVED_FUTURE4: SemanticType = SemanticType(0xFC);

impl SemanticType {
    /// Every byte is a valid semantic type: 64 bases times 4 refinements.
    pub const fn from_code(code: u8) -> Self {
        SemanticType(code)
    }

    pub const fn code(self) -> u8 {
        self.0
    }

    pub fn super_kind(self) -> SuperKind {
        SuperKind::from_code(self.0)
    }

    pub fn kind(self) -> Kind {
        Kind::from_code(self.0)
    }

    /// Position of the type within its kind, 0-3.
    pub const fn super_type(self) -> u8 {
        (self.0 & 0x0C) >> 2
    }

    pub const fn refinement(self) -> u8 {
        self.0 & 0x03
    }

    pub const fn base(self) -> SemanticType {
        SemanticType(self.0 & 0xFC)
    }

    /// Replace the refinement bits. Only the low two bits of `refinement` are used.
    pub const fn with_refinement(self, refinement: u8) -> SemanticType {
        SemanticType((self.0 & 0xFC) | (refinement & 0x03))
    }

    pub fn name(self) -> &'static str {
        BASE_NAMES[(self.0 >> 2) as usize]
    }

    pub fn summary(self) -> &'static str {
        BASE_SUMMARIES[(self.0 >> 2) as usize]
    }

    /// The 64 base types in code order.
    pub fn all() -> impl Iterator<Item = SemanticType> {
        (0u8..64).map(|i| SemanticType(i << 2))
    }

    pub fn is_definition(self) -> bool {
        self.kind() == Kind::Definition
    }

    pub fn is_call(self) -> bool {
        let base = self.base();
        base == COMPUTATION_CALL || base == EXECUTION_INVOCATION
    }

    pub fn is_control_flow(self) -> bool {
        self.kind() == Kind::FlowControl
    }

    pub fn is_identifier(self) -> bool {
        self.kind() == Kind::Name
    }

    pub fn is_literal(self) -> bool {
        self.kind() == Kind::Literal
    }

    pub fn is_operator(self) -> bool {
        self.kind() == Kind::Operator
    }

    pub fn is_type(self) -> bool {
        self.kind() == Kind::Type
    }

    pub fn is_external(self) -> bool {
        self.kind() == Kind::External
    }

    pub fn is_error(self) -> bool {
        self.kind() == Kind::ErrorHandling
    }

    pub fn is_metadata(self) -> bool {
        self.kind() == Kind::Metadata
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SemanticType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        type_code(s).ok_or_else(|| anyhow::anyhow!("unknown semantic type: {s}"))
    }
}

impl Serialize for SemanticType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Reverse lookup of a base type name. Case-sensitive, like the `.def` files.
pub fn type_code(name: &str) -> Option<SemanticType> {
    BASE_NAMES
        .iter()
        .position(|&n| n == name)
        .map(|i| SemanticType((i as u8) << 2))
}

pub fn kind_code(name: &str) -> Option<Kind> {
    Kind::ALL.into_iter().find(|k| k.name() == name)
}

pub fn super_kind_code(name: &str) -> Option<SuperKind> {
    SuperKind::ALL.into_iter().find(|k| k.name() == name)
}

pub fn definition_types() -> Vec<SemanticType> {
    Kind::Definition.types().to_vec()
}

pub fn control_flow_types() -> Vec<SemanticType> {
    Kind::FlowControl.types().to_vec()
}

/// Types an indexer typically offers as search targets.
pub fn searchable_types() -> Vec<SemanticType> {
    let mut types = definition_types();
    types.extend([
        COMPUTATION_CALL,
        EXECUTION_INVOCATION,
        NAME_IDENTIFIER,
        NAME_QUALIFIED,
        EXTERNAL_IMPORT,
        EXTERNAL_EXPORT,
        METADATA_COMMENT,
    ]);
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_extraction() {
        let t = DEFINITION_MODULE.with_refinement(2);
        assert_eq!(t.code(), 0x7E);
        assert_eq!(t.super_kind(), SuperKind::Computation);
        assert_eq!(t.kind(), Kind::Definition);
        assert_eq!(t.super_type(), 3);
        assert_eq!(t.refinement(), 2);
        assert_eq!(t.base(), DEFINITION_MODULE);
    }

    #[test]
    fn names_ignore_refinement() {
        assert_eq!(LITERAL_STRUCTURED.name(), "LITERAL_STRUCTURED");
        assert_eq!(LITERAL_STRUCTURED.with_refinement(1).name(), "LITERAL_STRUCTURED");
        assert_eq!(format!("{PARSER_DELIMITER}"), "PARSER_DELIMITER");
    }

    #[test]
    fn reverse_lookups() {
        assert_eq!(type_code("PARSER_DELIMITER"), Some(PARSER_DELIMITER));
        assert_eq!(type_code("parser_delimiter"), None);
        assert_eq!(type_code("NOT_A_TYPE"), None);
        assert_eq!(kind_code("FLOW_CONTROL"), Some(Kind::FlowControl));
        assert_eq!(kind_code("FLOW"), None);
        assert_eq!(super_kind_code("META_EXTERNAL"), Some(SuperKind::MetaExternal));
        assert!("BOGUS".parse::<SemanticType>().is_err());
        assert_eq!("FLOW_LOOP".parse::<SemanticType>().unwrap(), FLOW_LOOP);
    }

    #[test]
    fn all_has_64_unique_names() {
        let names: std::collections::HashSet<&str> =
            SemanticType::all().map(|t| t.name()).collect();
        assert_eq!(names.len(), 64);
        assert_eq!(SemanticType::all().count(), 64);
    }

    #[test]
    fn kind_codes_and_names() {
        assert_eq!(Kind::Operator.code(), 0x40);
        assert_eq!(Kind::ParserSpecific.code(), 0xE0);
        assert_eq!(Kind::ErrorHandling.super_kind(), SuperKind::ControlEffects);
        assert_eq!(Kind::from_code(0xB7), Kind::Organization);
        assert_eq!(Kind::Literal.types(), [
            LITERAL_NUMBER,
            LITERAL_STRING,
            LITERAL_ATOMIC,
            LITERAL_STRUCTURED
        ]);
    }

    #[test]
    fn predicates() {
        assert!(DEFINITION_FUNCTION.is_definition());
        assert!(!COMPUTATION_CALL.is_definition());
        assert!(COMPUTATION_CALL.is_call());
        assert!(EXECUTION_INVOCATION.with_refinement(3).is_call());
        assert!(FLOW_SYNC.is_control_flow());
        assert!(NAME_SCOPED.is_identifier());
        assert!(LITERAL_ATOMIC.is_literal());
        assert!(OPERATOR_LOGICAL.is_operator());
        assert!(TYPE_GENERIC.is_type());
        assert!(EXTERNAL_EMBED.is_external());
        assert!(ERROR_CATCH.is_error());
        assert!(METADATA_COMMENT.is_metadata());
        assert!(!PARSER_SYNTAX.is_error());
    }

    #[test]
    fn category_lists() {
        assert_eq!(definition_types().len(), 4);
        assert!(control_flow_types().iter().all(|t| t.is_control_flow()));
        let searchable = searchable_types();
        assert!(searchable.contains(&DEFINITION_CLASS));
        assert!(searchable.contains(&COMPUTATION_CALL));
        assert!(!searchable.contains(&PARSER_PUNCTUATION));
    }

    #[test]
    fn serializes_as_name() {
        let json = serde_json::to_string(&LITERAL_STRING).unwrap();
        assert_eq!(json, "\"LITERAL_STRING\"");
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn components_recompose(code in any::<u8>()) {
                let t = SemanticType::from_code(code);
                let rebuilt = t.kind().code() | (t.super_type() << 2) | t.refinement();
                prop_assert_eq!(rebuilt, code);
                prop_assert_eq!(t.kind().super_kind(), t.super_kind());
            }

            #[test]
            fn name_lookup_returns_base(code in any::<u8>()) {
                let t = SemanticType::from_code(code);
                prop_assert_eq!(type_code(t.name()), Some(t.base()));
            }
        }
    }
}
