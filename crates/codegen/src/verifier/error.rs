//! Verifier generation error types.

/// Error type for verifier generation.
///
/// Allows error propagation with `?` for both logical misuse (e.g. asked
/// to emit op constraints for an empty set of op definitions) and
/// formatting errors while writing generated text.
#[derive(Debug)]
pub enum EmitError {
    /// A logical error in verifier generation
    Logic(String),
    /// A formatting error while writing generated text
    Format(std::fmt::Error),
}

impl std::fmt::Display for EmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitError::Logic(s) => write!(f, "{}", s),
            EmitError::Format(e) => write!(f, "verifier generation error: {}", e),
        }
    }
}

impl std::error::Error for EmitError {}

impl From<String> for EmitError {
    fn from(s: String) -> Self {
        EmitError::Logic(s)
    }
}

impl From<std::fmt::Error> for EmitError {
    fn from(e: std::fmt::Error) -> Self {
        EmitError::Format(e)
    }
}
