//! Error types for rendering and validation
//!
//! These are rejections. Content problems found while validating are
//! reported as diagnostics instead, see [`crate::validate`].

/// Errors during description rendering
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A step cell violates a text rule
    #[error("{message}")]
    RuleViolation {
        /// Id of the violated rule
        rule: &'static str,
        /// 1-based step number
        step: usize,
        /// Rendered rule message
        message: String,
    },
}

/// Errors that make validation meaningless
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidateError {
    /// Description holds no non-blank line
    #[error("description is empty")]
    EmptyDescription,

    /// Business goal pattern does not compile
    #[error("invalid business goal pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern as configured
        pattern: String,
        /// Regex compiler message
        message: String,
    },
}

impl ValidateError {
    /// Create invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: &regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: source.to_string(),
        }
    }
}
