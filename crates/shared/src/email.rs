//! Email address rule shared by profile validation and account creation

/// Whether `value` is accepted as an email address
///
/// A non-empty local part and domain around a single `@`, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.chars().any(char::is_whitespace) {
        return false;
    }
    match trimmed.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rule() {
        assert!(is_valid_email("ana@shop.example"));
        assert!(is_valid_email(" ana@shop.example "));
        assert!(is_valid_email("ops@localhost"));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("@shop.example"));
        assert!(!is_valid_email("ana@"));
        assert!(!is_valid_email("ana@shop@example"));
        assert!(!is_valid_email("a b@shop.example"));
    }
}
