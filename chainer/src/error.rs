use crate::ast::Span;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Detailed error information with source location
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub span: Span,
    pub source_id: String,
    pub source_text: Arc<str>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        write!(f, " at {}:{}:{}", self.source_id, self.span.line, self.span.col)
    }
}

/// Error types for building knowledge-base content
///
/// The knowledge base operations themselves never fail; errors only arise
/// while turning text into facts and rules.
#[derive(Debug, Clone, Error)]
pub enum KbError {
    /// Parse error with source location
    #[error("Parse error: {0}")]
    Parse(Box<ErrorDetails>),

    /// A rule that cannot fire, such as one without antecedents
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value}). {suggestion}")]
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    /// Engine error without specific source location
    #[error("Engine error: {0}")]
    Engine(String),

    /// Multiple errors collected together
    #[error("{}", format_multiple(.0))]
    MultipleErrors(Vec<KbError>),
}

impl KbError {
    /// Create a parse error with source information
    pub fn parse(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
    ) -> Self {
        Self::Parse(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            suggestion: None,
        }))
    }

    /// Create a parse error with suggestion
    pub fn parse_with_suggestion(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Parse(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            suggestion: Some(suggestion.into()),
        }))
    }
}

fn format_multiple(errors: &[KbError]) -> String {
    let mut out = String::from("Multiple errors:");
    for (i, error) in errors.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, error));
    }
    out
}
