//! Email address handling.

use crate::blocklist::error::LookupError;

/// Extract the lowercase domain part of an email address.
///
/// The address must contain exactly one `@` with a non-empty part after it.
/// No other syntax checks are made.
pub fn extract_domain(email: &str) -> Result<String, LookupError> {
    let email = email.trim().to_lowercase();

    let mut parts = email.split('@');
    let (Some(_local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(LookupError::InvalidEmail);
    };

    if domain.is_empty() {
        return Err(LookupError::InvalidEmail);
    }

    Ok(domain.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_normalized_domain() {
        assert_eq!(extract_domain("user@Example.COM").unwrap(), "example.com");
        assert_eq!(extract_domain("  Someone@mail.org \n").unwrap(), "mail.org");
    }

    #[test]
    fn test_empty_local_part_is_accepted() {
        assert_eq!(extract_domain("@mailinator.com").unwrap(), "mailinator.com");
    }

    #[test]
    fn test_rejects_wrong_at_count() {
        for bad in ["", "plainaddress", "a@b@c.com", "@@", "user@"] {
            assert_eq!(extract_domain(bad), Err(LookupError::InvalidEmail), "input {bad:?}");
        }
    }

    #[test]
    fn test_whitespace_only_domain_is_rejected_after_trim() {
        assert_eq!(extract_domain("user@   "), Err(LookupError::InvalidEmail));
    }
}
