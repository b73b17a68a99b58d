//! Validation helpers for DTOs.

use validator::ValidationError;

/// Bounds applied to player and team names.
const NAME_MIN_CHARS: usize = 1;
const NAME_MAX_CHARS: usize = 50;

/// Validates that a player or team name is 1-50 characters long.
///
/// Names are matched case-sensitively everywhere else, so no trimming or
/// normalisation happens here.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.chars().count();
    if chars < NAME_MIN_CHARS {
        let mut err = ValidationError::new("name_empty");
        err.message = Some("Name must not be empty".into());
        return Err(err);
    }
    if chars > NAME_MAX_CHARS {
        let mut err = ValidationError::new("name_too_long");
        err.message =
            Some(format!("Name must be at most {NAME_MAX_CHARS} characters (got {chars})").into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_names() {
        assert!(validate_name("Alice").is_ok());
        assert!(validate_name("a").is_ok());
        assert!(validate_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn rejects_empty_and_oversized_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn length_is_counted_in_characters_not_bytes() {
        // 50 multi-byte characters are fine even though they exceed 50 bytes.
        assert!(validate_name(&"é".repeat(50)).is_ok());
        assert!(validate_name(&"é".repeat(51)).is_err());
    }
}
