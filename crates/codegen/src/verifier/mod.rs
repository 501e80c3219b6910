//! Static verifier function emission.
//!
//! Dedupes structurally identical constraints across op definitions and
//! rewrite-pattern leaves, and emits one shared C++ verification routine
//! per unique constraint. Call sites (op verifiers, pattern guards) look
//! up the generated name through this emitter instead of inlining the
//! check.
//!
//! One emitter instance is scoped to one output compilation unit: its
//! scope label is derived from the input schema file name plus a caller
//! tag, which keeps generated symbols unique when several outputs are
//! compiled together. Collection must complete before emission starts for
//! a kind; both entry points run their (idempotent) collection pass first.

mod error;
mod templates;
mod uniquer;

pub use error::EmitError;

use crate::schema::{Constraint, ConstraintKind, MatcherKind, OpDef, PatternLeaf};
use crate::subst::{NO_SUBST_MARKER, SubstContext};
use std::fmt::Write as _;
use uniquer::{ConstraintUniquer, unique_output_label};

/// An attribute constraint that references anything other than itself and
/// the enclosing op cannot be extracted into a shared routine: operand and
/// result references need accessors that only exist at the call site.
fn can_unique_attr_constraint(constraint: &Constraint) -> bool {
    let test = SubstContext::new()
        .with_self("attr")
        .with_op("*op")
        .apply(&constraint.predicate);
    !test.contains(NO_SUBST_MARKER)
}

/// Same call-site restriction as attributes. Additionally, a property
/// without a declared interface type has no fixed parameter type for a
/// shared routine, and a literal `true` predicate is no constraint at all.
fn can_unique_prop_constraint(constraint: &Constraint) -> bool {
    let test = SubstContext::new()
        .with_self("prop")
        .with_op("*op")
        .apply(&constraint.predicate);
    !test.contains(NO_SUBST_MARKER) && test != "true" && constraint.interface_type().is_some()
}

/// Emitter for shared, uniqued constraint verification routines.
pub struct StaticVerifierEmitter {
    output: String,
    unique_output_label: String,
    type_constraints: ConstraintUniquer,
    attr_constraints: ConstraintUniquer,
    prop_constraints: ConstraintUniquer,
    successor_constraints: ConstraintUniquer,
    region_constraints: ConstraintUniquer,
}

impl StaticVerifierEmitter {
    /// Create an emitter scoped to one output unit.
    ///
    /// `input_filename` is the schema file the output is generated from;
    /// `tag` distinguishes independent emitter instances over the same
    /// file.
    pub fn new(input_filename: &str, tag: &str) -> Self {
        StaticVerifierEmitter {
            output: String::new(),
            unique_output_label: unique_output_label(input_filename, tag),
            type_constraints: ConstraintUniquer::new(ConstraintKind::Type),
            attr_constraints: ConstraintUniquer::new(ConstraintKind::Attr),
            prop_constraints: ConstraintUniquer::new(ConstraintKind::Prop),
            successor_constraints: ConstraintUniquer::new(ConstraintKind::Successor),
            region_constraints: ConstraintUniquer::new(ConstraintKind::Region),
        }
    }

    /// Generated text accumulated so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consume the emitter, returning the generated text.
    pub fn take_output(self) -> String {
        self.output
    }

    // --- Lookup surface ---

    /// Resolve a type constraint to its generated routine name.
    ///
    /// Every type constraint that reaches lookup must have been collected;
    /// a miss is a collection/emission ordering bug and panics.
    pub fn type_constraint_fn(&self, constraint: &Constraint) -> &str {
        match self.type_constraints.resolve(constraint) {
            Some(name) => name,
            None => panic!(
                "type constraint was never collected: {}",
                constraint.predicate
            ),
        }
    }

    /// Resolve an attribute constraint, or `None` if it was ineligible for
    /// uniquing (the caller emits the check inline instead).
    pub fn attr_constraint_fn(&self, constraint: &Constraint) -> Option<&str> {
        self.attr_constraints.resolve(constraint)
    }

    /// Resolve a property constraint, or `None` if it was ineligible for
    /// uniquing.
    pub fn prop_constraint_fn(&self, constraint: &Constraint) -> Option<&str> {
        self.prop_constraints.resolve(constraint)
    }

    /// Resolve a successor constraint; panics if it was never collected.
    pub fn successor_constraint_fn(&self, constraint: &Constraint) -> &str {
        match self.successor_constraints.resolve(constraint) {
            Some(name) => name,
            None => panic!(
                "successor constraint was never collected: {}",
                constraint.predicate
            ),
        }
    }

    /// Resolve a region constraint; panics if it was never collected.
    pub fn region_constraint_fn(&self, constraint: &Constraint) -> &str {
        match self.region_constraints.resolve(constraint) {
            Some(name) => name,
            None => panic!(
                "region constraint was never collected: {}",
                constraint.predicate
            ),
        }
    }

    // --- Collection ---

    /// Collect every uniquable constraint from the given op definitions.
    ///
    /// Names are assigned in first-seen order, so for a fixed input order
    /// the output is byte-identical across runs.
    pub fn collect_op_constraints(&mut self, op_defs: &[OpDef]) {
        for op in op_defs {
            for value in op.operands.iter().chain(op.results.iter()) {
                if let Some(c) = &value.constraint
                    && c.has_predicate()
                {
                    self.type_constraints.register(c, &self.unique_output_label);
                }
            }
            for named in &op.attributes {
                if let Some(c) = &named.constraint
                    && c.has_predicate()
                    && !named.derived
                    && can_unique_attr_constraint(c)
                {
                    self.attr_constraints.register(c, &self.unique_output_label);
                }
            }
            for named in &op.properties {
                if let Some(c) = &named.constraint
                    && c.has_predicate()
                    && can_unique_prop_constraint(c)
                {
                    self.prop_constraints.register(c, &self.unique_output_label);
                }
            }
            for successor in &op.successors {
                if let Some(c) = &successor.constraint
                    && c.has_predicate()
                {
                    self.successor_constraints
                        .register(c, &self.unique_output_label);
                }
            }
            for region in &op.regions {
                if let Some(c) = &region.constraint
                    && c.has_predicate()
                {
                    self.region_constraints
                        .register(c, &self.unique_output_label);
                }
            }
        }
    }

    /// Collect pattern-leaf constraints into the same per-kind maps used
    /// for op constraints, so a structurally identical constraint shares
    /// one routine between an op verifier and a pattern guard.
    pub fn collect_pattern_constraints(&mut self, leaves: &[PatternLeaf]) {
        for leaf in leaves {
            let uniquer = match leaf.matcher {
                MatcherKind::Operand => &mut self.type_constraints,
                MatcherKind::Attr => &mut self.attr_constraints,
                MatcherKind::Prop => &mut self.prop_constraints,
            };
            uniquer.register(&leaf.constraint, &self.unique_output_label);
        }
    }

    // --- Emission ---

    /// Emit every uniqued op constraint routine, wrapped in the first op's
    /// namespace: type, then attribute, property, successor, and region
    /// constraints.
    pub fn emit_op_constraints(&mut self, op_defs: &[OpDef]) -> Result<(), EmitError> {
        let first = op_defs.first().ok_or_else(|| {
            EmitError::Logic("cannot emit op constraints without op definitions".to_string())
        })?;
        let namespace = &first.namespace;

        self.collect_op_constraints(op_defs);

        templates::open_namespace(&mut self.output, namespace)?;
        emit_uniqued(
            &mut self.output,
            &self.type_constraints,
            "type",
            templates::render_type_constraint,
        )?;
        emit_uniqued(
            &mut self.output,
            &self.attr_constraints,
            "attr",
            templates::render_attr_constraint,
        )?;
        emit_prop_constraints(&mut self.output, &self.prop_constraints)?;
        emit_uniqued(
            &mut self.output,
            &self.successor_constraints,
            "successor",
            templates::render_successor_constraint,
        )?;
        emit_uniqued(
            &mut self.output,
            &self.region_constraints,
            "region",
            templates::render_region_constraint,
        )?;
        templates::close_namespace(&mut self.output, namespace)?;
        Ok(())
    }

    /// Emit pattern-guard routines for the given leaves: type, then
    /// attribute, then property matchers. Properties without a concrete
    /// interface type are emitted generic over the receiver type.
    pub fn emit_pattern_constraints(&mut self, leaves: &[PatternLeaf]) -> Result<(), EmitError> {
        self.collect_pattern_constraints(leaves);

        let ctx = SubstContext::new()
            .with_op("*op")
            .with_builder("rewriter")
            .with_self("type");
        for (constraint, name) in self.type_constraints.iter() {
            write!(
                self.output,
                "{}",
                templates::render_pattern_constraint(
                    name,
                    &ctx.apply(&constraint.predicate),
                    &escape_string(&constraint.summary),
                    "::mlir::Type type",
                )
            )?;
        }

        let ctx = ctx.with_self("attr");
        for (constraint, name) in self.attr_constraints.iter() {
            write!(
                self.output,
                "{}",
                templates::render_pattern_constraint(
                    name,
                    &ctx.apply(&constraint.predicate),
                    &escape_string(&constraint.summary),
                    "::mlir::Attribute attr",
                )
            )?;
        }

        let ctx = ctx.with_self("prop");
        for (constraint, name) in self.prop_constraints.iter() {
            // Constraints generic over the interface type are templatized
            // under the assumption that call sites supply a compatible
            // value type.
            let receiver = match constraint.interface_type() {
                Some(ty) => format!("{} prop", ty),
                None => {
                    writeln!(self.output, "template <typename T>")?;
                    "T prop".to_string()
                }
            };
            write!(
                self.output,
                "{}",
                templates::render_pattern_constraint(
                    name,
                    &ctx.apply(&constraint.predicate),
                    &escape_string(&constraint.summary),
                    &receiver,
                )
            )?;
        }
        Ok(())
    }
}

/// Emit one routine per registered constraint, in first-seen order.
fn emit_uniqued(
    out: &mut String,
    uniquer: &ConstraintUniquer,
    self_name: &str,
    render: fn(&str, &str, &str) -> String,
) -> Result<(), EmitError> {
    let ctx = SubstContext::new().with_self(self_name).with_op("*op");
    for (constraint, name) in uniquer.iter() {
        write!(
            out,
            "{}",
            render(
                name,
                &ctx.apply(&constraint.predicate),
                &escape_string(&constraint.summary),
            )
        )?;
    }
    Ok(())
}

/// Property routines substitute the interface type into the signature, so
/// they cannot go through the generic path. Uniqued op properties always
/// carry an interface type; pattern-collected ones may not and fall back
/// to a generic receiver.
fn emit_prop_constraints(out: &mut String, uniquer: &ConstraintUniquer) -> Result<(), EmitError> {
    let ctx = SubstContext::new().with_self("prop").with_op("*op");
    for (constraint, name) in uniquer.iter() {
        let interface_type = match constraint.interface_type() {
            Some(ty) => ty.to_string(),
            None => {
                writeln!(out, "template <typename T>")?;
                "T".to_string()
            }
        };
        write!(
            out,
            "{}",
            templates::render_prop_constraint(
                name,
                &ctx.apply(&constraint.predicate),
                &escape_string(&constraint.summary),
                &interface_type,
            )
        )?;
    }
    Ok(())
}

/// Escape text for embedding in a C++ string literal.
///
/// Backslash, quote, newline, and tab get named escapes; other
/// non-printable bytes are rendered as three-digit octal escapes.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for &b in value.as_bytes() {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'"' => out.push_str("\\\""),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{:03o}", b)),
        }
    }
    out
}
