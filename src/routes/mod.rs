pub mod auth;
pub mod boards;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::{error::InternalError, web, HttpResponse};
use serde_json::json;

use crate::auth::AuthMiddleware;

/// Registers the resource scopes. Paths are relative to the `/api` scope.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register)
            .service(auth::me),
    )
    .service(
        web::scope("/users")
            .service(users::list_users)
            .service(users::get_user_by_email)
            .service(users::get_user_by_username)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::update_user_status)
            .service(users::delete_user),
    )
    .service(
        web::scope("/boards")
            .service(boards::list_boards)
            .service(boards::create_board)
            .service(boards::get_board)
            .service(boards::update_board)
            .service(boards::delete_board)
            .service(boards::list_board_tasks),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

fn bad_request(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(json!({ "error": message })),
    )
    .into()
}

/// Registers the whole application: extractor error handlers, `/health`, and
/// the token-guarded `/api` scope. `web::Data<AppState>` must be added by the caller.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| bad_request(err.to_string())),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| bad_request(err.to_string())))
    .app_data(web::PathConfig::default().error_handler(|err, _req| bad_request(err.to_string())))
    .service(health::health)
    .service(web::scope("/api").wrap(AuthMiddleware).configure(config));
}
