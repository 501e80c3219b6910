//! Constraint uniquing and generated-name allocation.
//!
//! Each constraint kind gets its own `ConstraintUniquer`: an
//! insertion-ordered map from a constraint's structural value to its
//! generated function name. Registering the same constraint twice returns
//! the existing name, so every call site that references a structurally
//! identical constraint resolves to one shared routine.

use crate::schema::{Constraint, ConstraintKind};
use std::collections::HashMap;
use std::path::Path;

/// Insertion-ordered dedup map from constraint to generated name.
pub(super) struct ConstraintUniquer {
    kind: ConstraintKind,
    entries: Vec<(Constraint, String)>,
    index: HashMap<Constraint, usize>,
}

impl ConstraintUniquer {
    pub fn new(kind: ConstraintKind) -> Self {
        ConstraintUniquer {
            kind,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a constraint, allocating a name on first sight.
    ///
    /// Idempotent: re-registering an equal constraint returns the name
    /// assigned when it was first seen. Names carry the map size after
    /// insertion, so ordinals are dense per kind starting at 1.
    pub fn register(&mut self, constraint: &Constraint, label: &str) -> &str {
        if let Some(&i) = self.index.get(constraint) {
            return &self.entries[i].1;
        }
        let i = self.entries.len();
        let name = unique_name(self.kind, label, i + 1);
        self.index.insert(constraint.clone(), i);
        self.entries.push((constraint.clone(), name));
        &self.entries[i].1
    }

    /// Look up the generated name without registering.
    pub fn resolve(&self, constraint: &Constraint) -> Option<&str> {
        self.index
            .get(constraint)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Iterate entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Constraint, &str)> {
        self.entries.iter().map(|(c, n)| (c, n.as_str()))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Build a generated function name for one registered constraint.
fn unique_name(kind: ConstraintKind, label: &str, ordinal: usize) -> String {
    format!(
        "__opdef_local_{}_constraint_{}{}",
        kind.label(),
        label,
        ordinal
    )
}

/// Derive the output scope label from the input file name and tag.
///
/// Uses the base file name with its extension stripped; bytes outside
/// `[A-Za-z0-9_]` are replaced by their hex encoding. The label keeps
/// generated symbols from colliding when outputs for different schema
/// files are linked together.
pub(super) fn unique_output_label(input_filename: &str, tag: &str) -> String {
    let base = Path::new(input_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let mut label = String::from(tag);
    for &b in base.as_bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' {
            label.push(b as char);
        } else {
            label.push_str(&format!("{:X}", b));
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint(predicate: &str, summary: &str) -> Constraint {
        Constraint {
            predicate: predicate.to_string(),
            summary: summary.to_string(),
            interface_type: None,
        }
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut uniquer = ConstraintUniquer::new(ConstraintKind::Attr);
        let c = constraint("$_self.getValue() > 0", "positive");

        let first = uniquer.register(&c, "ops").to_string();
        let second = uniquer.register(&c.clone(), "ops").to_string();
        assert_eq!(first, second);
        assert_eq!(uniquer.len(), 1);
    }

    #[test]
    fn test_ordinals_are_dense_from_one() {
        let mut uniquer = ConstraintUniquer::new(ConstraintKind::Type);
        let a = uniquer
            .register(&constraint("$_self.isInteger()", "integer"), "ops")
            .to_string();
        let b = uniquer
            .register(&constraint("$_self.isIndex()", "index"), "ops")
            .to_string();
        assert_eq!(a, "__opdef_local_type_constraint_ops1");
        assert_eq!(b, "__opdef_local_type_constraint_ops2");
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_does_not_register() {
        let uniquer = ConstraintUniquer::new(ConstraintKind::Region);
        assert!(
            uniquer
                .resolve(&constraint("$_self.empty()", "empty"))
                .is_none()
        );
    }

    #[test]
    fn test_label_sanitizes_non_identifier_bytes() {
        assert_eq!(unique_output_label("foo-ops.toml", ""), "foo2Dops");
        assert_eq!(unique_output_label("/a/b/my_ops.toml", "v2"), "v2my_ops");
    }

    #[test]
    fn test_labels_isolate_scopes() {
        let foo = unique_output_label("foo.toml", "");
        let bar = unique_output_label("bar.toml", "");
        assert_ne!(foo, bar);

        // Same file, different tags must not collide either.
        assert_ne!(
            unique_output_label("foo.toml", "decl"),
            unique_output_label("foo.toml", "def")
        );
    }
}
