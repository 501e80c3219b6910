//! Symbolic placeholder substitution.
//!
//! Constraint predicates are written as templates with symbolic
//! placeholders: `$_self` for the checked value, `$_op` for the enclosing
//! operation, `$_builder` for the pattern rewriter. A `SubstContext`
//! carries the binding for one emission pass and rewrites a template into
//! concrete expression text.
//!
//! A placeholder with no binding expands to [`NO_SUBST_MARKER`] followed by
//! the placeholder itself. Callers test for the marker to detect
//! predicates that reference state outside the binding (e.g. a sibling
//! operand) and therefore cannot be extracted into a shared routine.

/// Marker emitted in place of a placeholder with no binding.
pub const NO_SUBST_MARKER: &str = "<no-subst-found>";

/// A fixed set of named substitutions for one emission pass.
#[derive(Debug, Clone, Default)]
pub struct SubstContext {
    self_expansion: Option<String>,
    op_expansion: Option<String>,
    builder_expansion: Option<String>,
}

impl SubstContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `$_self` to the given receiver expression
    pub fn with_self(mut self, expansion: &str) -> Self {
        self.self_expansion = Some(expansion.to_string());
        self
    }

    /// Bind `$_op` to the given operation reference
    pub fn with_op(mut self, expansion: &str) -> Self {
        self.op_expansion = Some(expansion.to_string());
        self
    }

    /// Bind `$_builder` to the given rewriter reference
    pub fn with_builder(mut self, expansion: &str) -> Self {
        self.builder_expansion = Some(expansion.to_string());
        self
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "_self" => self.self_expansion.as_deref(),
            "_op" => self.op_expansion.as_deref(),
            "_builder" => self.builder_expansion.as_deref(),
            _ => None,
        }
    }

    /// Rewrite a condition template using this context's bindings.
    ///
    /// `$$` escapes a literal `$`. A lone `$` not introducing a
    /// placeholder passes through unchanged.
    pub fn apply(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    out.push('$');
                }
                Some(&next) if next == '_' || next.is_ascii_alphabetic() => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n == '_' || n.is_ascii_alphanumeric() {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    match self.lookup(&name) {
                        Some(expansion) => out.push_str(expansion),
                        None => {
                            // Keep the placeholder after the marker so the
                            // offending reference shows up in diagnostics.
                            out.push_str(NO_SUBST_MARKER);
                            out.push('$');
                            out.push_str(&name);
                        }
                    }
                }
                _ => out.push('$'),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_self_and_op() {
        let ctx = SubstContext::new().with_self("attr").with_op("*op");
        assert_eq!(
            ctx.apply("$_self.getValue() > 0 && $_op.hasTrait()"),
            "attr.getValue() > 0 && *op.hasTrait()"
        );
    }

    #[test]
    fn test_unbound_placeholder_leaves_marker() {
        let ctx = SubstContext::new().with_self("attr").with_op("*op");
        let out = ctx.apply("$_self == $_other");
        assert!(out.contains(NO_SUBST_MARKER));
        assert!(out.contains("$_other"));
    }

    #[test]
    fn test_builder_binding() {
        let ctx = SubstContext::new().with_builder("rewriter");
        assert_eq!(
            ctx.apply("$_builder.getIndexType()"),
            "rewriter.getIndexType()"
        );
        // Without the binding the same template is unresolvable.
        let bare = SubstContext::new().apply("$_builder.getIndexType()");
        assert!(bare.contains(NO_SUBST_MARKER));
    }

    #[test]
    fn test_dollar_escapes() {
        let ctx = SubstContext::new().with_self("x");
        assert_eq!(ctx.apply("$$_self + $_self"), "$_self + x");
        assert_eq!(ctx.apply("cost: $5"), "cost: $5");
        assert_eq!(ctx.apply("trailing $"), "trailing $");
    }
}
