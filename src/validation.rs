//! Field-level validation for registration data.
//!
//! Pure predicates with no I/O. Intake runs them in a fixed order to pick
//! the failure code; admin search filters reuse them to short-circuit a
//! query with an invalid filter value to an empty result.

/// Display names are bounded by the NVARCHAR(255) column.
pub const MAX_NAME_LEN: usize = 255;

/// Admissible room numbers.
pub const MIN_ROOM: i32 = 0;
pub const MAX_ROOM: i32 = 32_767;

pub const MAX_PHONE_LEN: usize = 15;
pub const MAX_EMAIL_LEN: usize = 255;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Non-empty after trimming, at most [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().count() <= MAX_NAME_LEN
}

pub fn validate_room(room: i32) -> bool {
    (MIN_ROOM..=MAX_ROOM).contains(&room)
}

/// Phone shape: optional leading `+`, then 4-15 digits.
pub fn validate_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (4..=MAX_PHONE_LEN).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Email shape: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.') && domain.len() > 2
}

/// Usernames: 3-32 characters from `[a-zA-Z0-9._-]`.
pub fn validate_username(username: &str) -> bool {
    (MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
}

/// Minimum strength policy: at least 8 characters with a lowercase letter,
/// an uppercase letter, a digit and a symbol.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert!(validate_name("Bob"));
        assert!(validate_name("Nguyễn Văn A"));
        assert!(!validate_name(""));
        assert!(!validate_name("   "));
        assert!(!validate_name(&"x".repeat(300)));
        assert!(validate_name(&"x".repeat(255)));
    }

    #[test]
    fn test_room() {
        assert!(validate_room(0));
        assert!(validate_room(5));
        assert!(validate_room(32_767));
        assert!(!validate_room(-1));
        assert!(!validate_room(32_768));
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("0123456789"));
        assert!(validate_phone("+84912345678"));
        assert!(!validate_phone("123"));
        assert!(!validate_phone("12345678901234567890"));
        assert!(!validate_phone("0123-456"));
        assert!(!validate_phone("phone"));
    }

    #[test]
    fn test_email() {
        assert!(validate_email("bob@example.com"));
        assert!(validate_email("a.b-c_d@mail.example.org"));
        assert!(!validate_email("bob"));
        assert!(!validate_email("bob@"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("bob@example"));
        assert!(!validate_email("bob@.com"));
        assert!(!validate_email("bob @example.com"));
        assert!(!validate_email("bob@ex@ample.com"));
    }

    #[test]
    fn test_username() {
        assert!(validate_username("bob"));
        assert!(validate_username("bob.smith_01"));
        assert!(!validate_username("ab"));
        assert!(!validate_username(&"a".repeat(33)));
        assert!(!validate_username("bob smith"));
        assert!(!validate_username("bob!"));
    }

    #[test]
    fn test_password() {
        assert!(validate_password("Str0ng!pwd"));
        assert!(!validate_password("short1!"));
        assert!(!validate_password("alllowercase1!"));
        assert!(!validate_password("ALLUPPERCASE1!"));
        assert!(!validate_password("NoDigits!!"));
        assert!(!validate_password("NoSymbols123"));
    }
}
