//! Name/native extraction strategies and node flags referenced by `.def` rows.

use std::fmt;

use serde::Serialize;

/// How a human-readable name is derived from a matched node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NameExtraction {
    #[default]
    None,
    NodeText,
    FirstChild,
    FindIdentifier,
    FindProperty,
    FindAssignmentTarget,
    FindQualifiedIdentifier,
    FindInDeclarator,
    FindCallTarget,
    Custom,
}

impl NameExtraction {
    pub const ALL: [NameExtraction; 10] = [
        NameExtraction::None,
        NameExtraction::NodeText,
        NameExtraction::FirstChild,
        NameExtraction::FindIdentifier,
        NameExtraction::FindProperty,
        NameExtraction::FindAssignmentTarget,
        NameExtraction::FindQualifiedIdentifier,
        NameExtraction::FindInDeclarator,
        NameExtraction::FindCallTarget,
        NameExtraction::Custom,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            NameExtraction::None => "NONE",
            NameExtraction::NodeText => "NODE_TEXT",
            NameExtraction::FirstChild => "FIRST_CHILD",
            NameExtraction::FindIdentifier => "FIND_IDENTIFIER",
            NameExtraction::FindProperty => "FIND_PROPERTY",
            NameExtraction::FindAssignmentTarget => "FIND_ASSIGNMENT_TARGET",
            NameExtraction::FindQualifiedIdentifier => "FIND_QUALIFIED_IDENTIFIER",
            NameExtraction::FindInDeclarator => "FIND_IN_DECLARATOR",
            NameExtraction::FindCallTarget => "FIND_CALL_TARGET",
            NameExtraction::Custom => "CUSTOM",
        }
    }

    /// Accepts the bare name or `ExtractionStrategy::NAME`.
    pub fn from_name(s: &str) -> Option<NameExtraction> {
        let s = s.trim();
        let s = s.strip_prefix("ExtractionStrategy::").unwrap_or(s);
        Self::ALL.into_iter().find(|e| e.name() == s)
    }
}

impl fmt::Display for NameExtraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pattern used for native context extraction. Only parsed and validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NativeExtraction {
    #[default]
    None,
    FunctionWithParams,
    FunctionWithDecorators,
    ArrowFunction,
    AsyncFunction,
    ClassWithInheritance,
    ClassWithMethods,
    VariableWithType,
    GenericFunction,
    MethodDefinition,
    ConstructorDefinition,
    InterfaceDefinition,
    EnumDefinition,
    ImportStatement,
    ExportStatement,
    FunctionCall,
    Custom,
}

impl NativeExtraction {
    pub const ALL: [NativeExtraction; 17] = [
        NativeExtraction::None,
        NativeExtraction::FunctionWithParams,
        NativeExtraction::FunctionWithDecorators,
        NativeExtraction::ArrowFunction,
        NativeExtraction::AsyncFunction,
        NativeExtraction::ClassWithInheritance,
        NativeExtraction::ClassWithMethods,
        NativeExtraction::VariableWithType,
        NativeExtraction::GenericFunction,
        NativeExtraction::MethodDefinition,
        NativeExtraction::ConstructorDefinition,
        NativeExtraction::InterfaceDefinition,
        NativeExtraction::EnumDefinition,
        NativeExtraction::ImportStatement,
        NativeExtraction::ExportStatement,
        NativeExtraction::FunctionCall,
        NativeExtraction::Custom,
    ];

    pub fn code(self) -> u8 {
        match self {
            NativeExtraction::Custom => 255,
            other => other as u8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NativeExtraction::None => "NONE",
            NativeExtraction::FunctionWithParams => "FUNCTION_WITH_PARAMS",
            NativeExtraction::FunctionWithDecorators => "FUNCTION_WITH_DECORATORS",
            NativeExtraction::ArrowFunction => "ARROW_FUNCTION",
            NativeExtraction::AsyncFunction => "ASYNC_FUNCTION",
            NativeExtraction::ClassWithInheritance => "CLASS_WITH_INHERITANCE",
            NativeExtraction::ClassWithMethods => "CLASS_WITH_METHODS",
            NativeExtraction::VariableWithType => "VARIABLE_WITH_TYPE",
            NativeExtraction::GenericFunction => "GENERIC_FUNCTION",
            NativeExtraction::MethodDefinition => "METHOD_DEFINITION",
            NativeExtraction::ConstructorDefinition => "CONSTRUCTOR_DEFINITION",
            NativeExtraction::InterfaceDefinition => "INTERFACE_DEFINITION",
            NativeExtraction::EnumDefinition => "ENUM_DEFINITION",
            NativeExtraction::ImportStatement => "IMPORT_STATEMENT",
            NativeExtraction::ExportStatement => "EXPORT_STATEMENT",
            NativeExtraction::FunctionCall => "FUNCTION_CALL",
            NativeExtraction::Custom => "CUSTOM",
        }
    }

    pub fn from_name(s: &str) -> Option<NativeExtraction> {
        let s = s.trim();
        let s = s.strip_prefix("NativeExtractionStrategy::").unwrap_or(s);
        Self::ALL.into_iter().find(|e| e.name() == s)
    }
}

impl fmt::Display for NativeExtraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Orthogonal per-node properties. Bits 0x04-0x80 are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const EMPTY: NodeFlags = NodeFlags(0);
    /// Semantic language construct, not just a token.
    pub const IS_CONSTRUCT: NodeFlags = NodeFlags(0x01);
    /// Has a body (definition rather than declaration).
    pub const IS_EMBODIED: NodeFlags = NodeFlags(0x02);

    pub const fn from_bits(bits: u8) -> Self {
        NodeFlags(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | other.0)
    }

    fn named(name: &str) -> Option<NodeFlags> {
        match name {
            "IS_CONSTRUCT" | "IS_KEYWORD" | "IS_KEYWORD_IF_LEAF" => Some(Self::IS_CONSTRUCT),
            "IS_EMBODIED" => Some(Self::IS_EMBODIED),
            _ => None,
        }
    }

    /// Parse a flags expression such as `0`, `0x03`, or
    /// `ASTNodeFlags::IS_CONSTRUCT | IS_EMBODIED`.
    pub fn parse_expr(expr: &str) -> Option<NodeFlags> {
        let mut flags = NodeFlags::EMPTY;
        for term in expr.split('|') {
            let term = term.trim();
            let term = term.strip_prefix("ASTNodeFlags::").unwrap_or(term);
            let parsed = if let Some(hex) = term.strip_prefix("0x").or_else(|| term.strip_prefix("0X")) {
                u8::from_str_radix(hex, 16).ok().map(NodeFlags)
            } else if term.bytes().all(|b| b.is_ascii_digit()) && !term.is_empty() {
                term.parse::<u8>().ok().map(NodeFlags)
            } else {
                Self::named(term)
            };
            flags = flags.union(parsed?);
        }
        Some(flags)
    }
}

impl fmt::Display for NodeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.contains(Self::IS_CONSTRUCT) {
            parts.push("IS_CONSTRUCT".to_string());
        }
        if self.contains(Self::IS_EMBODIED) {
            parts.push("IS_EMBODIED".to_string());
        }
        let reserved = self.0 & !0x03;
        if reserved != 0 {
            parts.push(format!("0x{reserved:02x}"));
        }
        if parts.is_empty() {
            f.write_str("0")
        } else {
            f.write_str(&parts.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_extraction_round_names() {
        for e in NameExtraction::ALL {
            assert_eq!(NameExtraction::from_name(e.name()), Some(e));
        }
        assert_eq!(NameExtraction::FindProperty.code(), 4);
        assert_eq!(NameExtraction::Custom.code(), 9);
        assert_eq!(
            NameExtraction::from_name("ExtractionStrategy::NODE_TEXT"),
            Some(NameExtraction::NodeText)
        );
        assert_eq!(NameExtraction::from_name("node_text"), None);
    }

    #[test]
    fn native_extraction_codes() {
        assert_eq!(NativeExtraction::None.code(), 0);
        assert_eq!(NativeExtraction::FunctionCall.code(), 15);
        assert_eq!(NativeExtraction::Custom.code(), 255);
        assert_eq!(
            NativeExtraction::from_name("CLASS_WITH_METHODS"),
            Some(NativeExtraction::ClassWithMethods)
        );
        assert_eq!(NativeExtraction::from_name("CLASS"), None);
    }

    #[test]
    fn flags_expressions() {
        assert_eq!(NodeFlags::parse_expr("0"), Some(NodeFlags::EMPTY));
        assert_eq!(NodeFlags::parse_expr("0x03").map(|f| f.bits()), Some(3));
        assert_eq!(
            NodeFlags::parse_expr("ASTNodeFlags::IS_CONSTRUCT | ASTNodeFlags::IS_EMBODIED")
                .map(|f| f.bits()),
            Some(3)
        );
        assert_eq!(
            NodeFlags::parse_expr("IS_KEYWORD"),
            Some(NodeFlags::IS_CONSTRUCT)
        );
        assert_eq!(NodeFlags::parse_expr("IS_PUBLIC"), None);
        assert_eq!(NodeFlags::parse_expr(""), None);
        assert_eq!(NodeFlags::parse_expr("256"), None);
    }

    #[test]
    fn flags_display() {
        assert_eq!(NodeFlags::EMPTY.to_string(), "0");
        assert_eq!(
            NodeFlags::IS_CONSTRUCT.union(NodeFlags::IS_EMBODIED).to_string(),
            "IS_CONSTRUCT | IS_EMBODIED"
        );
        assert_eq!(NodeFlags::from_bits(0x05).to_string(), "IS_CONSTRUCT | 0x04");
    }
}
