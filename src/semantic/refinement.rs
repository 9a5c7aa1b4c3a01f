//! Named 2-bit refinements (bits 0-1 of a semantic type).
//!
//! `.def` rows spell these as `SemanticRefinements::<Group>::<NAME>` and OR
//! them into the base type, e.g.
//! `LITERAL_STRUCTURED | SemanticRefinements::Structured::MAPPING`.

use super::{Kind, SemanticType};
use super::{
    COMPUTATION_CALL, DEFINITION_CLASS, DEFINITION_FUNCTION, DEFINITION_VARIABLE,
    EXTERNAL_IMPORT, FLOW_CONDITIONAL, FLOW_JUMP, FLOW_LOOP, LITERAL_NUMBER, LITERAL_STRING,
    LITERAL_STRUCTURED, NAME_IDENTIFIER, OPERATOR_ARITHMETIC, OPERATOR_ASSIGNMENT,
    OPERATOR_COMPARISON, TRANSFORM_AGGREGATION, TRANSFORM_ITERATION, TRANSFORM_QUERY,
};

/// Which base types a refinement group may be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliesTo {
    Type(SemanticType),
    Kind(Kind),
    Any,
}

impl AppliesTo {
    pub fn accepts(self, semantic_type: SemanticType) -> bool {
        match self {
            AppliesTo::Type(t) => semantic_type.base() == t,
            AppliesTo::Kind(k) => semantic_type.kind() == k,
            AppliesTo::Any => true,
        }
    }
}

pub struct RefinementGroup {
    pub name: &'static str,
    pub applies_to: AppliesTo,
    /// Value names indexed by refinement bits 0-3.
    pub values: [&'static str; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refinement {
    pub group: &'static str,
    pub name: &'static str,
    pub bits: u8,
}

pub static GROUPS: &[RefinementGroup] = &[
    RefinementGroup {
        name: "Function",
        applies_to: AppliesTo::Type(DEFINITION_FUNCTION),
        values: ["REGULAR", "LAMBDA", "CONSTRUCTOR", "ASYNC"],
    },
    RefinementGroup {
        name: "Number",
        applies_to: AppliesTo::Type(LITERAL_NUMBER),
        values: ["INTEGER", "FLOAT", "SCIENTIFIC", "COMPLEX"],
    },
    RefinementGroup {
        name: "Structured",
        applies_to: AppliesTo::Type(LITERAL_STRUCTURED),
        values: ["GENERIC", "SEQUENCE", "MAPPING", "SET"],
    },
    RefinementGroup {
        name: "Arithmetic",
        applies_to: AppliesTo::Type(OPERATOR_ARITHMETIC),
        values: ["BINARY", "UNARY", "BITWISE", "RANGE"],
    },
    RefinementGroup {
        name: "Conditional",
        applies_to: AppliesTo::Type(FLOW_CONDITIONAL),
        values: ["BINARY", "MULTIWAY", "GUARD", "TERNARY"],
    },
    RefinementGroup {
        name: "Loop",
        applies_to: AppliesTo::Type(FLOW_LOOP),
        values: ["COUNTER", "ITERATOR", "CONDITIONAL", "INFINITE"],
    },
    RefinementGroup {
        name: "Organization",
        applies_to: AppliesTo::Kind(Kind::Organization),
        values: ["SEQUENTIAL", "COLLECTION", "MAPPING", "HIERARCHICAL"],
    },
    RefinementGroup {
        name: "Variable",
        applies_to: AppliesTo::Type(DEFINITION_VARIABLE),
        values: ["MUTABLE", "IMMUTABLE", "PARAMETER", "FIELD"],
    },
    RefinementGroup {
        name: "Call",
        applies_to: AppliesTo::Type(COMPUTATION_CALL),
        values: ["FUNCTION", "METHOD", "CONSTRUCTOR", "MACRO"],
    },
    RefinementGroup {
        name: "Import",
        applies_to: AppliesTo::Type(EXTERNAL_IMPORT),
        values: ["MODULE", "SELECTIVE", "WILDCARD", "RELATIVE"],
    },
    RefinementGroup {
        name: "String",
        applies_to: AppliesTo::Type(LITERAL_STRING),
        values: ["LITERAL", "TEMPLATE", "REGEX", "RAW"],
    },
    RefinementGroup {
        name: "Comparison",
        applies_to: AppliesTo::Type(OPERATOR_COMPARISON),
        values: ["EQUALITY", "RELATIONAL", "MEMBERSHIP", "PATTERN"],
    },
    RefinementGroup {
        name: "Assignment",
        applies_to: AppliesTo::Type(OPERATOR_ASSIGNMENT),
        values: ["SIMPLE", "COMPOUND", "DESTRUCTURE", "AUGMENTED"],
    },
    RefinementGroup {
        name: "Class",
        applies_to: AppliesTo::Type(DEFINITION_CLASS),
        values: ["REGULAR", "ABSTRACT", "GENERIC", "ENUM"],
    },
    RefinementGroup {
        name: "Jump",
        applies_to: AppliesTo::Type(FLOW_JUMP),
        values: ["RETURN", "BREAK", "CONTINUE", "GOTO"],
    },
    RefinementGroup {
        name: "Identifier",
        applies_to: AppliesTo::Type(NAME_IDENTIFIER),
        values: ["VARIABLE", "FUNCTION", "TYPE", "LABEL"],
    },
    RefinementGroup {
        name: "Query",
        applies_to: AppliesTo::Type(TRANSFORM_QUERY),
        values: ["SIMPLE", "NESTED", "FILTERED", "GROUPED"],
    },
    RefinementGroup {
        name: "Aggregation",
        applies_to: AppliesTo::Type(TRANSFORM_AGGREGATION),
        values: ["SIMPLE", "CONDITIONAL", "WINDOWED", "GROUPED"],
    },
    RefinementGroup {
        name: "Iteration",
        applies_to: AppliesTo::Type(TRANSFORM_ITERATION),
        values: ["MAP", "FILTER", "REDUCE", "FLAT"],
    },
    RefinementGroup {
        name: "Join",
        applies_to: AppliesTo::Kind(Kind::Transform),
        values: ["INNER", "LEFT", "RIGHT", "OUTER"],
    },
    RefinementGroup {
        name: "Generic",
        applies_to: AppliesTo::Any,
        values: ["UNSPECIFIED", "RESERVED1", "RESERVED2", "RESERVED3"],
    },
];

pub fn group(name: &str) -> Option<&'static RefinementGroup> {
    GROUPS.iter().find(|g| g.name == name)
}

pub fn lookup(group_name: &str, value: &str) -> Option<Refinement> {
    let group = group(group_name)?;
    let bits = group.values.iter().position(|&v| v == value)?;
    Some(Refinement {
        group: group.name,
        name: group.values[bits],
        bits: bits as u8,
    })
}

/// Parse `SemanticRefinements::Group::NAME` (the namespace prefix is optional).
pub fn parse_path(path: &str) -> Option<Refinement> {
    let path = path.trim();
    let path = path.strip_prefix("SemanticRefinements::").unwrap_or(path);
    let (group_name, value) = path.split_once("::")?;
    lookup(group_name.trim(), value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_group_and_value() {
        let r = lookup("Structured", "MAPPING").unwrap();
        assert_eq!(r.bits, 2);
        assert_eq!(r.group, "Structured");
        assert!(lookup("Structured", "MAP").is_none());
        assert!(lookup("Nope", "MAPPING").is_none());
    }

    #[test]
    fn parse_with_and_without_namespace() {
        assert_eq!(
            parse_path("SemanticRefinements::Function::LAMBDA").map(|r| r.bits),
            Some(1)
        );
        assert_eq!(parse_path("Loop::INFINITE").map(|r| r.bits), Some(3));
        assert!(parse_path("LAMBDA").is_none());
    }

    #[test]
    fn applicability() {
        let structured = group("Structured").unwrap();
        assert!(structured.applies_to.accepts(LITERAL_STRUCTURED));
        assert!(!structured.applies_to.accepts(LITERAL_STRING));
        let organization = group("Organization").unwrap();
        assert!(organization.applies_to.accepts(super::super::ORGANIZATION_LIST));
        assert!(group("Generic").unwrap().applies_to.accepts(FLOW_JUMP));
    }

    #[test]
    fn group_names_unique() {
        let mut names: Vec<&str> = GROUPS.iter().map(|g| g.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), GROUPS.len());
    }
}
