//! Declarative op definition schema.
//!
//! The input to the generator: a TOML document describing operations
//! (operands, results, attributes, properties, successors, regions) and
//! rewrite-pattern leaves, each carrying optional constraints.
//!
//! `Constraint` is a plain value type compared and hashed structurally;
//! the same logical constraint built independently at two call sites
//! dedupes to one entry.

use serde::Deserialize;

/// A reusable boolean condition attached to a value, attribute, property,
/// successor, or region.
///
/// `predicate` is a condition template containing symbolic placeholders
/// (`$_self`, `$_op`) resolved at emission time. `summary` is the
/// human-readable text cited in failure messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Constraint {
    /// Condition template with symbolic placeholders
    pub predicate: String,
    /// Human-readable description used in failure messages
    #[serde(default)]
    pub summary: String,
    /// Interface type of the checked value (property constraints only)
    #[serde(default)]
    pub interface_type: Option<String>,
}

impl Constraint {
    /// Whether a non-empty condition is present.
    pub fn has_predicate(&self) -> bool {
        !self.predicate.is_empty()
    }

    /// Interface type, with empty strings treated as unspecified.
    pub fn interface_type(&self) -> Option<&str> {
        self.interface_type.as_deref().filter(|t| !t.is_empty())
    }
}

/// The kind of state a constraint is checked against.
///
/// Determines the eligibility rule, the routine template, and the label
/// used in generated function names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Type,
    Attr,
    Prop,
    Successor,
    Region,
}

impl ConstraintKind {
    /// Label used in generated function names
    pub fn label(self) -> &'static str {
        match self {
            ConstraintKind::Type => "type",
            ConstraintKind::Attr => "attr",
            ConstraintKind::Prop => "prop",
            ConstraintKind::Successor => "successor",
            ConstraintKind::Region => "region",
        }
    }
}

/// A named operand or result with an optional type constraint.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedValue {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<Constraint>,
}

/// A named attribute with an optional constraint.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedAttribute {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<Constraint>,
    /// Derived attributes are computed, not stored; never verified here
    #[serde(default)]
    pub derived: bool,
}

/// A named property with an optional constraint.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedProperty {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<Constraint>,
}

/// A named successor block with an optional constraint.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedSuccessor {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<Constraint>,
}

/// A named region with an optional constraint.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<Constraint>,
}

/// One operation definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpDef {
    pub name: String,
    /// C++ namespace the generated verifiers are wrapped in
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub operands: Vec<NamedValue>,
    #[serde(default)]
    pub results: Vec<NamedValue>,
    #[serde(default)]
    pub attributes: Vec<NamedAttribute>,
    #[serde(default)]
    pub properties: Vec<NamedProperty>,
    #[serde(default)]
    pub successors: Vec<NamedSuccessor>,
    #[serde(default)]
    pub regions: Vec<NamedRegion>,
}

/// What a rewrite-pattern leaf matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    /// Matches the type of an operand (or result)
    Operand,
    /// Matches an attribute
    Attr,
    /// Matches a property
    Prop,
}

/// A single matcher within a rewrite pattern's match expression.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternLeaf {
    pub matcher: MatcherKind,
    pub constraint: Constraint,
}

/// A full schema document: op definitions plus pattern leaves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub ops: Vec<OpDef>,
    #[serde(default)]
    pub patterns: Vec<PatternLeaf>,
}

impl Schema {
    /// Parse a schema from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse schema: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_schema() {
        let schema = Schema::from_toml(
            r#"
[[ops]]
name = "AddOp"
namespace = "arith"

[[ops.operands]]
name = "lhs"
[ops.operands.constraint]
predicate = "$_self.isInteger()"
summary = "integer type"

[[ops.results]]
name = "sum"

[[ops.attributes]]
name = "overflow"
derived = true
[ops.attributes.constraint]
predicate = "$_self.getValue() >= 0"
summary = "non-negative"

[[ops.properties]]
name = "fastmath"
[ops.properties.constraint]
predicate = "$_self.isValid()"
summary = "valid fastmath flags"
interface_type = "FastMathFlags"

[[ops.regions]]
name = "body"
[ops.regions.constraint]
predicate = "$_self.getBlocks().size() == 1"
summary = "single-block region"

[[patterns]]
matcher = "attr"
[patterns.constraint]
predicate = "$_self.getValue() >= 0"
summary = "non-negative"
"#,
        )
        .unwrap();

        assert_eq!(schema.ops.len(), 1);
        let op = &schema.ops[0];
        assert_eq!(op.name, "AddOp");
        assert_eq!(op.namespace, "arith");
        assert_eq!(op.operands.len(), 1);
        assert!(op.operands[0].constraint.is_some());
        assert!(op.results[0].constraint.is_none());
        assert!(op.attributes[0].derived);
        assert_eq!(
            op.properties[0]
                .constraint
                .as_ref()
                .unwrap()
                .interface_type(),
            Some("FastMathFlags")
        );
        assert_eq!(schema.patterns.len(), 1);
        assert_eq!(schema.patterns[0].matcher, MatcherKind::Attr);
    }

    #[test]
    fn test_constraint_structural_equality() {
        let a = Constraint {
            predicate: "$_self.isInteger()".to_string(),
            summary: "integer".to_string(),
            interface_type: None,
        };
        let b = a.clone();
        assert_eq!(a, b);

        let c = Constraint {
            summary: "index".to_string(),
            ..a.clone()
        };
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_interface_type_is_unspecified() {
        let c = Constraint {
            predicate: "true".to_string(),
            summary: String::new(),
            interface_type: Some(String::new()),
        };
        assert_eq!(c.interface_type(), None);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Schema::from_toml("ops = 3").unwrap_err();
        assert!(err.contains("Failed to parse schema"));
    }
}
