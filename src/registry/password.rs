//! Argon2 password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::error::RegistryError;

/// Hash a plaintext password into the PHC string stored in the database.
pub fn hash_password(password: &str) -> Result<String, RegistryError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| RegistryError::PasswordHash(e.to_string()))
}

/// Verify a plaintext password against a stored PHC string.
///
/// A malformed stored hash counts as a verification failure, not an error:
/// the caller only needs a yes/no answer.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    match PasswordHash::new(hashed) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("Str0ng!pwd").unwrap();
        assert!(hashed.starts_with("$argon2"));
        assert!(verify_password("Str0ng!pwd", &hashed));
        assert!(!verify_password("WrongPwd1!", &hashed));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(!verify_password("Str0ng!pwd", "not-a-phc-string"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Str0ng!pwd").unwrap();
        let b = hash_password("Str0ng!pwd").unwrap();
        assert_ne!(a, b);
    }
}
