//! opdef-codegen library
//!
//! Generates shared C++ verification routines from a declarative op
//! definition schema (TOML). Structurally identical constraints are
//! deduplicated into a single named routine, and every call site —
//! whether an op verifier or a rewrite-pattern guard — resolves to the
//! same generated name.
//!
//! # Usage
//!
//! ```rust,ignore
//! use opdefgen::{Schema, StaticVerifierEmitter};
//!
//! let schema = Schema::from_toml(&schema_text)?;
//! let mut emitter = StaticVerifierEmitter::new("my_ops.toml", "");
//! emitter.emit_op_constraints(&schema.ops)?;
//! let generated = emitter.take_output();
//! ```

pub mod schema;
pub mod subst;
pub mod verifier;

pub use schema::{Constraint, ConstraintKind, MatcherKind, OpDef, PatternLeaf, Schema};
pub use subst::{NO_SUBST_MARKER, SubstContext};
pub use verifier::{EmitError, StaticVerifierEmitter, escape_string};

use std::fs;
use std::path::Path;

/// Generate verifier routines from a schema document.
///
/// `input_filename` scopes the generated symbol names; `tag` distinguishes
/// independent outputs generated from the same file.
pub fn generate_verifiers(
    schema_text: &str,
    input_filename: &str,
    tag: &str,
) -> Result<String, String> {
    let schema = Schema::from_toml(schema_text)?;

    let mut emitter = StaticVerifierEmitter::new(input_filename, tag);
    if !schema.ops.is_empty() {
        emitter
            .emit_op_constraints(&schema.ops)
            .map_err(|e| e.to_string())?;
    }
    if !schema.patterns.is_empty() {
        emitter
            .emit_pattern_constraints(&schema.patterns)
            .map_err(|e| e.to_string())?;
    }
    Ok(emitter.take_output())
}

/// Generate verifier routines from a schema file and write them out.
pub fn generate_file(input_path: &Path, output_path: &Path, tag: &str) -> Result<(), String> {
    let schema_text = fs::read_to_string(input_path)
        .map_err(|e| format!("Failed to read schema file: {}", e))?;

    let input_filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let generated = generate_verifiers(&schema_text, input_filename, tag)?;

    fs::write(output_path, generated).map_err(|e| format!("Failed to write output file: {}", e))
}
