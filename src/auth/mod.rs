pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::Config;
use crate::models::UserDto;
use crate::validation::{not_blank, USERNAME_REGEX};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Settings the authentication layer needs at request time.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    /// Accounts registered with this (lowercased) email become admins.
    pub admin_email: Option<String>,
}

impl From<&Config> for AuthSettings {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiration_hours: config.jwt_expiration_hours,
            bcrypt_cost: config.bcrypt_cost,
            admin_email: config.admin_email.clone(),
        }
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// An email address or a username. Treated as an email when it contains `@`.
    #[validate(custom = "not_blank")]
    pub email_or_username: String,
    #[validate(custom = "not_blank")]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    #[validate(
        custom = "not_blank",
        length(max = 50, message = "El nombre no puede exceder 50 caracteres")
    )]
    pub first_name: String,
    #[validate(
        custom = "not_blank",
        length(max = 50, message = "El apellido no puede exceder 50 caracteres")
    )]
    pub last_name: String,
    /// Between 3 and 32 characters: letters, digits, underscores or hyphens.
    #[validate(
        length(
            min = 3,
            max = 32,
            message = "El nombre de usuario debe tener entre 3 y 32 caracteres"
        ),
        regex(
            path = "USERNAME_REGEX",
            message = "El nombre de usuario solo admite letras, números, guiones y guiones bajos"
        )
    )]
    pub username: String,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 100,
        message = "La contraseña debe tener entre 6 y 100 caracteres"
    ))]
    pub password: String,
}

impl RegisterData {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Response structure after successful authentication (login or registration).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT for session authentication.
    pub token: String,
    pub user: UserDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}
