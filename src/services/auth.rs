use chrono::Utc;
use log::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    generate_token, hash_password, verify_password, AuthResponse, AuthSettings, LoginData,
    RegisterData,
};
use crate::error::AppError;
use crate::models::{User, UserDto, UserRole};
use crate::repository::{UserByEmail, UserByUsername, UserLookup, UserWriter};

/// Creates an account and returns a token for it.
///
/// Email and username must be unused (case-insensitive), otherwise `Conflict`.
pub async fn register<R>(
    users: &R,
    settings: &AuthSettings,
    data: RegisterData,
) -> Result<AuthResponse, AppError>
where
    R: UserByEmail + UserByUsername + UserWriter + ?Sized,
{
    data.validate()?;

    let email = data.email.trim().to_lowercase();
    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }
    if users.find_by_username(&data.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".into()));
    }

    let role = if settings.admin_email.as_deref() == Some(email.as_str()) {
        UserRole::Admin
    } else {
        UserRole::User
    };
    let password_hash = hash_password(settings, &data.password)?;
    let user = users
        .insert(User::new(
            data.username.clone(),
            email,
            data.full_name(),
            password_hash,
            role,
        ))
        .await?;

    info!("registered user {} ({})", user.username, user.id);

    Ok(AuthResponse {
        token: generate_token(settings, user.id, user.role)?,
        user: UserDto::from(&user),
        message: Some("User registered successfully".into()),
        success: Some(true),
    })
}

/// Authenticates by email (identifier containing `@`) or username.
///
/// Unknown identifiers and wrong passwords both answer "Invalid credentials";
/// disabled accounts are `Forbidden` once the password is verified.
pub async fn login<R>(
    users: &R,
    settings: &AuthSettings,
    data: LoginData,
) -> Result<AuthResponse, AppError>
where
    R: UserByEmail + UserByUsername + UserWriter + ?Sized,
{
    data.validate()?;

    let identifier = data.email_or_username.trim();
    let found = if identifier.contains('@') {
        users.find_by_email(identifier).await?
    } else {
        users.find_by_username(identifier).await?
    };

    let mut user = match found {
        Some(user) if verify_password(&data.password, &user.password_hash) => user,
        _ => return Err(AppError::Unauthorized("Invalid credentials".into())),
    };

    if !user.is_active {
        return Err(AppError::Forbidden("Account is disabled".into()));
    }

    user.last_login_at = Some(Utc::now());
    let user = users.update(user).await?;

    info!("user {} logged in", user.id);

    Ok(AuthResponse {
        token: generate_token(settings, user.id, user.role)?,
        user: UserDto::from(&user),
        message: Some("Login successful".into()),
        success: Some(true),
    })
}

pub async fn current_user<R>(users: &R, user_id: Uuid) -> Result<UserDto, AppError>
where
    R: UserLookup + ?Sized,
{
    users
        .find_by_id(user_id)
        .await?
        .map(UserDto::from)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
