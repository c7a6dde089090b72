pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate a username: required, at most 150 chars, no whitespace.
pub fn validate_username(username: &str) -> Option<String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Some("Username is required".to_string());
    }
    if trimmed.chars().count() > 150 {
        return Some("Username must be at most 150 characters".to_string());
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Some("Username may not contain spaces".to_string());
    }
    None
}

/// An address needs a local part and a dotted domain.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Please enter your email address".to_string());
    }
    let well_formed = trimmed.len() <= 254
        && match trimmed.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };
    if !well_formed {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

/// Validate a new password and its confirmation.
pub fn validate_new_password(password: &str, confirm: &str) -> Option<String> {
    if password != confirm {
        return Some("Passwords do not match".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }
    None
}

/// Every field must be non-blank.
pub fn validate_all_present(values: &[&str]) -> Option<String> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Some("All fields are required".to_string());
    }
    None
}
