//! Input validation performed before a request is sent.

use crate::service::config::Limits;
use crate::util::errors::ValidationError;

/// Accepts when at least one input is present and present text reaches the
/// minimum length. Text is measured after trimming, in characters.
pub fn validate_input(
    text: Option<&str>,
    has_file: bool,
    limits: &Limits,
) -> Result<(), ValidationError> {
    let text = text.map(str::trim).filter(|t| !t.is_empty());

    let Some(text) = text else {
        return if has_file {
            Ok(())
        } else {
            Err(ValidationError::NoInput)
        };
    };

    let actual = text.chars().count();
    if actual < limits.min_text_length {
        return Err(ValidationError::TextTooShort {
            min: limits.min_text_length,
            actual,
        });
    }

    Ok(())
}

pub fn check_file_size(size: u64, max_size: u64) -> Result<(), ValidationError> {
    if size > max_size {
        return Err(ValidationError::FileTooLarge {
            max: max_size,
            actual: size,
        });
    }
    Ok(())
}
