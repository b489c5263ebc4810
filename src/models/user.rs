use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{not_blank, USERNAME_REGEX};

/// Role of an account. Admins may manage other users.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// A user account as held by the repositories.
///
/// Carries the password hash, so it is never serialized to clients directly;
/// handlers respond with `UserDto`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Always stored lowercased.
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        username: String,
        email: String,
        full_name: String,
        password_hash: String,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email: email.to_lowercase(),
            full_name,
            role,
            is_active: true,
            password_hash,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Applies the `Some` fields of an update and bumps `updated_at`.
    pub fn apply(&mut self, update: UpdateUserDto) {
        if let Some(full_name) = update.full_name {
            self.full_name = full_name.trim().to_string();
        }
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(email) = update.email {
            self.email = email.to_lowercase();
        }
        self.updated_at = Utc::now();
    }
}

/// Transport view of a user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login_at: user.last_login_at,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto::from(&user)
    }
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(
        custom = "not_blank",
        length(max = 100, message = "El nombre completo no puede exceder 100 caracteres")
    )]
    pub full_name: Option<String>,
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
    pub username: Option<String>,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: Option<String>,
}

impl UpdateUserDto {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.username.is_none() && self.email.is_none()
    }
}

/// Admin request to enable or disable an account.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserStatusDto {
    pub is_active: bool,
}

/// Query parameters for listing users.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    /// Matches username, email or full name (case-insensitive).
    pub search: Option<String>,
    pub is_active: Option<bool>,
}
