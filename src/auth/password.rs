use bcrypt::{hash, verify};

use crate::auth::AuthSettings;
use crate::error::AppError;

pub fn hash_password(settings: &AuthSettings, password: &str) -> Result<String, AppError> {
    Ok(hash(password, settings.bcrypt_cost)?)
}

/// Checks a login attempt against a stored hash.
///
/// A stored hash bcrypt cannot parse counts as a mismatch, so a corrupt
/// record locks its account out instead of failing every login with a 500.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match verify(password, password_hash) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("stored password hash could not be checked: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(bcrypt_cost: u32) -> AuthSettings {
        AuthSettings {
            jwt_secret: "secret".into(),
            jwt_expiration_hours: 1,
            bcrypt_cost,
            admin_email: None,
        }
    }

    #[test]
    fn test_hash_then_verify() {
        let hashed = hash_password(&settings(4), "Password123!").unwrap();

        assert_ne!(hashed, "Password123!");
        assert!(hashed.starts_with("$2"));
        assert!(verify_password("Password123!", &hashed));
        assert!(!verify_password("password123!", &hashed));
    }

    #[test]
    fn test_cost_below_bcrypt_minimum_is_internal_error() {
        assert!(matches!(
            hash_password(&settings(1), "Password123!"),
            Err(AppError::InternalServerError(_))
        ));
    }

    #[test]
    fn test_corrupt_hash_never_matches() {
        assert!(!verify_password("Password123!", "not-a-bcrypt-hash"));
        assert!(!verify_password("", ""));
    }
}
