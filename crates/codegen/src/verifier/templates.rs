//! C++ routine templates for uniqued constraints.
//!
//! One render function per constraint kind, each producing a complete
//! function definition from the generated name, the substituted condition
//! expression, and the escaped constraint summary. The templates fix each
//! kind's calling convention; the condition text is embedded verbatim.

use std::fmt::Write as _;

/// A type constraint routine. Called on the type of either an operand or
/// a result; `valueKind` is "operand" or "result" and `valueIndex` the
/// 1-based position within that group.
pub(super) fn render_type_constraint(name: &str, condition: &str, summary: &str) -> String {
    format!(
        r#"
static ::llvm::LogicalResult {name}(
    ::mlir::Operation *op, ::mlir::Type type, ::llvm::StringRef valueKind,
    unsigned valueIndex) {{
  if (!({condition})) {{
    return op->emitOpError(valueKind) << " #" << valueIndex
        << " must be {summary}, but got " << type;
  }}
  return ::mlir::success();
}}
"#
    )
}

/// An attribute constraint routine pair: a core overload taking an
/// explicit error reporter, and a convenience overload that binds the
/// reporter to the owning operation's diagnostic.
pub(super) fn render_attr_constraint(name: &str, condition: &str, summary: &str) -> String {
    format!(
        r#"
static ::llvm::LogicalResult {name}(
    ::mlir::Attribute attr, ::llvm::StringRef attrName,
    ::llvm::function_ref<::mlir::InFlightDiagnostic()> emitError) {{
  if (attr && !({condition}))
    return emitError() << "attribute '" << attrName
        << "' failed to satisfy constraint: {summary}";
  return ::mlir::success();
}}
static ::llvm::LogicalResult {name}(
    ::mlir::Operation *op, ::mlir::Attribute attr, ::llvm::StringRef attrName) {{
  return {name}(attr, attrName, [op]() {{
    return op->emitOpError();
  }});
}}
"#
    )
}

/// A property constraint routine pair, parameterized by the property's
/// interface type. Callers pass `T` (after a `template <typename T>`
/// line) when the constraint is shared generically across value kinds.
pub(super) fn render_prop_constraint(
    name: &str,
    condition: &str,
    summary: &str,
    interface_type: &str,
) -> String {
    format!(
        r#"
static ::llvm::LogicalResult {name}(
    {interface_type} prop, ::llvm::StringRef propName,
    ::llvm::function_ref<::mlir::InFlightDiagnostic()> emitError) {{
  if (!({condition}))
    return emitError() << "property '" << propName
        << "' failed to satisfy constraint: {summary}";
  return ::mlir::success();
}}
static ::llvm::LogicalResult {name}(
    ::mlir::Operation *op, {interface_type} prop, ::llvm::StringRef propName) {{
  return {name}(prop, propName, [op]() {{
    return op->emitOpError();
  }});
}}
"#
    )
}

/// A successor constraint routine.
pub(super) fn render_successor_constraint(name: &str, condition: &str, summary: &str) -> String {
    format!(
        r#"
static ::llvm::LogicalResult {name}(
    ::mlir::Operation *op, ::mlir::Block *successor,
    ::llvm::StringRef successorName, unsigned successorIndex) {{
  if (!({condition})) {{
    return op->emitOpError("successor #") << successorIndex << " ('"
        << successorName << ")' failed to verify constraint: {summary}";
  }}
  return ::mlir::success();
}}
"#
    )
}

/// A region constraint routine. Unnamed regions drop the quoted-name
/// clause from the failure message.
pub(super) fn render_region_constraint(name: &str, condition: &str, summary: &str) -> String {
    format!(
        r#"
static ::llvm::LogicalResult {name}(
    ::mlir::Operation *op, ::mlir::Region &region, ::llvm::StringRef regionName,
    unsigned regionIndex) {{
  if (!({condition})) {{
    return op->emitOpError("region #") << regionIndex
        << (regionName.empty() ? " " : " ('" + regionName + "') ")
        << "failed to verify constraint: {summary}";
  }}
  return ::mlir::success();
}}
"#
    )
}

/// A pattern-guard routine for a type, attribute, or property matcher.
/// `receiver` is the full checked-value parameter, e.g. `::mlir::Type type`
/// or `T prop`. Failures are reported as match failures against the
/// rewriter, not as op diagnostics.
pub(super) fn render_pattern_constraint(
    name: &str,
    condition: &str,
    summary: &str,
    receiver: &str,
) -> String {
    format!(
        r#"
static ::llvm::LogicalResult {name}(
    ::mlir::PatternRewriter &rewriter, ::mlir::Operation *op, {receiver},
    ::llvm::StringRef failureStr) {{
  if (!({condition})) {{
    return rewriter.notifyMatchFailure(op, [&](::mlir::Diagnostic &diag) {{
      diag << failureStr << ": {summary}";
    }});
  }}
  return ::mlir::success();
}}
"#
    )
}

/// Open a (possibly nested) C++ namespace block. Empty namespaces emit
/// nothing.
pub(super) fn open_namespace(out: &mut String, namespace: &str) -> std::fmt::Result {
    for segment in namespace.split("::").filter(|s| !s.is_empty()) {
        writeln!(out, "namespace {} {{", segment)?;
    }
    Ok(())
}

/// Close a namespace block opened by [`open_namespace`].
pub(super) fn close_namespace(out: &mut String, namespace: &str) -> std::fmt::Result {
    let segments: Vec<&str> = namespace.split("::").filter(|s| !s.is_empty()).collect();
    for segment in segments.into_iter().rev() {
        writeln!(out, "}} // namespace {}", segment)?;
    }
    Ok(())
}
