use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{BoardQuery, CreateBoardDto, TaskQuery, UpdateBoardDto},
    services,
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Lists the boards of the authenticated user, newest first.
///
/// ## Query Parameters:
/// - `search` (optional): matched against title and description (case-insensitive).
#[get("")]
pub async fn list_boards(
    state: web::Data<AppState>,
    query: web::Query<BoardQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let boards = services::boards::list_boards(&*state.boards, &user, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(boards))
}

/// Creates a board owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: returns the new `Board`.
/// - `422 Unprocessable Entity`: e.g. an empty title or a description over 300 characters.
#[post("")]
pub async fn create_board(
    state: web::Data<AppState>,
    board_data: web::Json<CreateBoardDto>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let board =
        services::boards::create_board(&*state.boards, &user, board_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(board))
}

#[get("/{id}")]
pub async fn get_board(
    state: web::Data<AppState>,
    board_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let board = services::boards::get_board(&*state.boards, &user, board_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(board))
}

#[put("/{id}")]
pub async fn update_board(
    state: web::Data<AppState>,
    board_id: web::Path<Uuid>,
    board_data: web::Json<UpdateBoardDto>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let board = services::boards::update_board(
        &*state.boards,
        &user,
        board_id.into_inner(),
        board_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(board))
}

/// Deletes a board together with its tasks.
#[delete("/{id}")]
pub async fn delete_board(
    state: web::Data<AppState>,
    board_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    services::boards::delete_board(&*state.boards, &user, board_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Tasks of one board, accepting the same filters as `GET /api/tasks`.
#[get("/{id}/tasks")]
pub async fn list_board_tasks(
    state: web::Data<AppState>,
    board_id: web::Path<Uuid>,
    query: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let query = TaskQuery {
        board_id: Some(board_id.into_inner()),
        ..query.into_inner()
    };
    let tasks = services::tasks::list_tasks(&*state.boards, &*state.tasks, &user, query).await?;
    Ok(HttpResponse::Ok().json(tasks))
}
