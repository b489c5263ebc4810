use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskDto, TaskQuery, UpdateTaskDto},
    services,
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Retrieves the tasks on the authenticated user's boards.
///
/// Tasks are ordered by position, then by creation date.
///
/// ## Query Parameters:
/// - `boardId` (optional): restrict to one board; a board the user does not own answers 404.
/// - `status` (optional): e.g. "todo", "in_progress", "review", "done".
/// - `priority` (optional): e.g. "low", "medium", "high", "urgent".
/// - `assignedTo` (optional): the assignee's user ID.
/// - `search` (optional): matched against titles and descriptions (case-insensitive).
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    query_params: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = services::tasks::list_tasks(
        &*state.boards,
        &*state.tasks,
        &user,
        query_params.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task on one of the authenticated user's boards.
///
/// ## Responses:
/// - `201 Created`: returns the new `Task`.
/// - `400 Bad Request`: malformed body, or an assignee that is unknown or inactive.
/// - `404 Not Found`: the board does not exist or belongs to someone else.
/// - `422 Unprocessable Entity`: e.g. an empty title.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<CreateTaskDto>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = services::tasks::create_task(
        &*state.boards,
        &*state.tasks,
        &*state.users,
        &user,
        task_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a specific task by its ID. Tasks on other users' boards answer 404.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task =
        services::tasks::get_task(&*state.boards, &*state.tasks, &user, task_id.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task; absent fields keep their value.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<UpdateTaskDto>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = services::tasks::update_task(
        &*state.boards,
        &*state.tasks,
        &*state.users,
        &user,
        task_id.into_inner(),
        task_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `404 Not Found`: the task does not exist or is not on one of the user's boards.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    services::tasks::delete_task(&*state.boards, &*state.tasks, &user, task_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
