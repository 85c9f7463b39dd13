//! Password hashing and verification using Argon2.
//!
//! Hashes are stored in PHC string format, which embeds the salt and
//! parameters, so verification needs nothing beyond the stored string.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// A malformed stored hash counts as a failed verification rather than an
/// error; login should not distinguish the two for the caller.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_the_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(!hash.is_empty());
        assert_ne!(hash, "hunter22");
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt per hash
        let a = hash_password("hunter22").unwrap();
        let b = hash_password("hunter22").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_accepts_correct_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }
}
