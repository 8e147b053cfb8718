/// Validation of user-submitted scan input before it leaves the process

use thiserror::Error;

use crate::error::AnalysisError;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Input too long: max {max} characters, got {actual}")]
    InputTooLong { max: usize, actual: usize },

    #[error("Invalid characters detected")]
    InvalidCharacters,

    #[error("Empty input not allowed")]
    EmptyInput,
}

impl From<ValidationError> for AnalysisError {
    fn from(err: ValidationError) -> Self {
        AnalysisError::InvalidInput(err.to_string())
    }
}

/// Validate scan input. Length is counted in characters so Arabic text is
/// not penalised for its UTF-8 width.
pub fn validate_input(input: &str, max_chars: usize) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let actual = input.chars().count();
    if actual > max_chars {
        return Err(ValidationError::InputTooLong {
            max: max_chars,
            actual,
        });
    }

    // Pasted scripts may carry escapes and form feeds; only NUL is refused.
    if input.contains('\0') {
        return Err(ValidationError::InvalidCharacters);
    }

    Ok(())
}
