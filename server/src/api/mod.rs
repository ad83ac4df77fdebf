//! HTTP API endpoints.
//!
//! One module per resource, each with its request/response types and
//! handlers. Field-shape validation happens here, at the edge; the
//! registration preconditions (entity existence, duplicates) belong to the
//! core validation layer.

pub mod events;
pub mod registrations;
pub mod users;

use crate::error::AppError;

/// Checks a string field's length against inclusive bounds.
fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min {
        return Err(AppError::bad_request(format!(
            "{field} must be at least {min} character{}",
            if min == 1 { "" } else { "s" }
        )));
    }
    if len > max {
        return Err(AppError::bad_request(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Rejects strings that are empty or whitespace only.
fn check_not_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(format!(
            "{field} cannot be empty or whitespace only"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(check_len("title", "a", 1, 3).is_ok());
        assert!(check_len("title", "abc", 1, 3).is_ok());
        assert!(check_len("title", "", 1, 3).is_err());
        assert!(check_len("title", "abcd", 1, 3).is_err());
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(check_not_blank("name", " \t ").is_err());
        assert!(check_not_blank("name", "ada").is_ok());
    }
}
