use thiserror::Error;

/// Business rule violations raised by domain types
///
/// All variants surface to callers as `400 Bad Request` with the message
/// shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("Cannot move registration from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("{0}")]
    Rule(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule(message.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Trims a required text field and checks its length
pub fn required_text(field: &str, value: String, max_len: usize) -> DomainResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > max_len {
        return Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(value)
}

/// Trims an optional text field; blank becomes `None`
pub fn optional_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> DomainResult<Option<String>> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) if v.chars().count() > max_len => Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("name", "  Ada ".into(), 10).unwrap(), "Ada");
    }

    #[test]
    fn required_text_rejects_blank_and_long() {
        assert!(required_text("name", "   ".into(), 10).is_err());
        assert!(required_text("name", "x".repeat(11), 10).is_err());
    }

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(optional_text("bio", Some("  ".into()), 10).unwrap(), None);
        assert_eq!(optional_text("bio", None, 10).unwrap(), None);
        assert!(optional_text("bio", Some("x".repeat(11)), 10).is_err());
    }

    #[test]
    fn transition_message() {
        let err = DomainError::InvalidTransition {
            from: "registered".into(),
            to: "devpost_confirmed".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot move registration from registered to devpost_confirmed"
        );
    }
}
