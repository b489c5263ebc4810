use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{UpdateUserDto, UpdateUserStatusDto, UserQuery},
    services,
    state::AppState,
};
use actix_web::{delete, get, patch, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Lists users.
///
/// ## Query Parameters:
/// - `search` (optional): matched against username, email and full name.
/// - `isActive` (optional): `true` or `false`.
#[get("")]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let users = services::users::list_users(&*state.users, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/by-email/{email}")]
pub async fn get_user_by_email(
    state: web::Data<AppState>,
    email: web::Path<String>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = services::users::find_by_email(&*state.users, &email).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[get("/by-username/{username}")]
pub async fn get_user_by_username(
    state: web::Data<AppState>,
    username: web::Path<String>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = services::users::find_by_username(&*state.users, &username).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[get("/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = services::users::get_user(&*state.users, user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Updates `fullName`, `username` and/or `email` of an account.
/// Allowed for the account itself and for admins.
#[put("/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    update: web::Json<UpdateUserDto>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let updated = services::users::update_user(
        &*state.users,
        &user,
        user_id.into_inner(),
        update.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Activates or deactivates an account (admin only).
#[patch("/{id}/status")]
pub async fn update_user_status(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    status: web::Json<UpdateUserStatusDto>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let updated = services::users::set_user_status(
        &*state.users,
        &user,
        user_id.into_inner(),
        status.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    services::users::delete_user(&*state.users, &user, user_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
