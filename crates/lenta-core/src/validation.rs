//! Form validation - explicit field checks returning error messages.
//!
//! A failed validation re-renders the form with prior input preserved and
//! must not touch the store; the caller decides how to surface the messages.

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate post text; an empty list means the input is acceptable.
pub fn validate_post_text(text: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if text.trim().is_empty() {
        errors.push(FieldError::new("text", "Post text must not be empty"));
    }
    errors
}

/// Validate comment text.
pub fn validate_comment_text(text: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if text.trim().is_empty() {
        errors.push(FieldError::new("text", "Comment text must not be empty"));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_post_text_is_rejected() {
        let errors = validate_post_text("   ");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "text");
    }

    #[test]
    fn non_empty_post_text_passes() {
        assert!(validate_post_text("Тестовый текст").is_empty());
    }

    #[test]
    fn empty_comment_text_is_rejected() {
        assert_eq!(validate_comment_text("").len(), 1);
        assert!(validate_comment_text("ok").is_empty());
    }
}
