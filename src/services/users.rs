use log::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{UpdateUserDto, UpdateUserStatusDto, User, UserDto, UserQuery};
use crate::repository::{UserByEmail, UserByStatus, UserByUsername, UserLookup, UserSearch, UserWriter};
use crate::validation::normalize_search;

fn not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

fn ensure_self_or_admin(actor: &AuthenticatedUser, user_id: Uuid) -> Result<(), AppError> {
    if actor.id == user_id || actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only manage your own account".into(),
        ))
    }
}

pub async fn get_user<R>(users: &R, user_id: Uuid) -> Result<UserDto, AppError>
where
    R: UserLookup + ?Sized,
{
    users
        .find_by_id(user_id)
        .await?
        .map(UserDto::from)
        .ok_or_else(not_found)
}

pub async fn find_by_email<R>(users: &R, email: &str) -> Result<UserDto, AppError>
where
    R: UserByEmail + ?Sized,
{
    users
        .find_by_email(email)
        .await?
        .map(UserDto::from)
        .ok_or_else(not_found)
}

pub async fn find_by_username<R>(users: &R, username: &str) -> Result<UserDto, AppError>
where
    R: UserByUsername + ?Sized,
{
    users
        .find_by_username(username)
        .await?
        .map(UserDto::from)
        .ok_or_else(not_found)
}

/// Lists users, optionally narrowed by a search term and/or the active flag.
/// Results are ordered by username.
pub async fn list_users<R>(users: &R, query: UserQuery) -> Result<Vec<UserDto>, AppError>
where
    R: UserSearch + UserByStatus + ?Sized,
{
    let found: Vec<User> = match (normalize_search(query.search.as_deref()), query.is_active) {
        (Some(term), active) => users
            .search(&term)
            .await?
            .into_iter()
            .filter(|u| active.map_or(true, |a| u.is_active == a))
            .collect(),
        (None, active) => users.list_by_active(active).await?,
    };
    Ok(found.iter().map(UserDto::from).collect())
}

/// Updates a profile. Allowed for the account itself and for admins.
pub async fn update_user<R>(
    users: &R,
    actor: &AuthenticatedUser,
    user_id: Uuid,
    update: UpdateUserDto,
) -> Result<UserDto, AppError>
where
    R: UserLookup + UserWriter + ?Sized,
{
    update.validate()?;
    ensure_self_or_admin(actor, user_id)?;
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let mut user = users.find_by_id(user_id).await?.ok_or_else(not_found)?;
    user.apply(update);
    let user = users.update(user).await?;

    info!("user {} updated by {}", user.id, actor.id);
    Ok(UserDto::from(&user))
}

/// Enables or disables an account. Admin only, and never on oneself.
pub async fn set_user_status<R>(
    users: &R,
    actor: &AuthenticatedUser,
    user_id: Uuid,
    status: UpdateUserStatusDto,
) -> Result<UserDto, AppError>
where
    R: UserLookup + UserWriter + ?Sized,
{
    if !actor.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can change account status".into(),
        ));
    }
    if actor.id == user_id {
        return Err(AppError::BadRequest(
            "Administrators cannot change their own status".into(),
        ));
    }

    let mut user = users.find_by_id(user_id).await?.ok_or_else(not_found)?;
    user.is_active = status.is_active;
    user.updated_at = chrono::Utc::now();
    let user = users.update(user).await?;

    info!(
        "user {} {} by {}",
        user.id,
        if user.is_active { "activated" } else { "deactivated" },
        actor.id
    );
    Ok(UserDto::from(&user))
}

/// Deletes an account together with its boards and their tasks.
pub async fn delete_user<R>(
    users: &R,
    actor: &AuthenticatedUser,
    user_id: Uuid,
) -> Result<(), AppError>
where
    R: UserWriter + ?Sized,
{
    ensure_self_or_admin(actor, user_id)?;
    if !users.delete(user_id).await? {
        return Err(not_found());
    }
    info!("user {} deleted by {}", user_id, actor.id);
    Ok(())
}
