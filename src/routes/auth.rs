use crate::{
    auth::{AuthenticatedUser, LoginData, RegisterData},
    error::AppError,
    services,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new user account and returns an `AuthResponse` with a token.
///
/// ## Responses:
/// - `201 Created`: the account was created.
/// - `400 Bad Request`: the body could not be parsed (e.g. a missing field).
/// - `409 Conflict`: the email or username is already taken.
/// - `422 Unprocessable Entity`: a validation rule failed.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterData>,
) -> Result<impl Responder, AppError> {
    let response =
        services::auth::register(&*state.users, &state.auth, register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// Authenticates by email or username and returns an `AuthResponse`.
///
/// ## Responses:
/// - `200 OK`: credentials accepted.
/// - `401 Unauthorized`: unknown account or wrong password.
/// - `403 Forbidden`: the account is disabled.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginData>,
) -> Result<impl Responder, AppError> {
    let response =
        services::auth::login(&*state.users, &state.auth, login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Returns the profile of the authenticated user.
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let profile = services::auth::current_user(&*state.users, user.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
