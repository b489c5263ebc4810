use log::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{CreateTaskDto, Task, TaskQuery, UpdateTaskDto};
use crate::repository::{BoardLookup, BoardsByOwner, TaskFilterQuery, TaskLookup, TaskWriter, UserLookup};
use crate::services::boards::owned_board;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Loads a task that sits on one of the actor's boards.
async fn visible_task<B, T>(
    boards: &B,
    tasks: &T,
    actor: &AuthenticatedUser,
    task_id: Uuid,
) -> Result<Task, AppError>
where
    B: BoardLookup + ?Sized,
    T: TaskLookup + ?Sized,
{
    let task = tasks.find_by_id(task_id).await?.ok_or_else(task_not_found)?;
    owned_board(boards, actor.id, task.board_id)
        .await
        .map_err(|_| task_not_found())?;
    Ok(task)
}

async fn ensure_assignable<U>(users: &U, user_id: Uuid) -> Result<(), AppError>
where
    U: UserLookup + ?Sized,
{
    match users.find_by_id(user_id).await? {
        Some(user) if user.is_active => Ok(()),
        _ => Err(AppError::BadRequest(
            "Assigned user not found or inactive".into(),
        )),
    }
}

pub async fn create_task<B, T, U>(
    boards: &B,
    tasks: &T,
    users: &U,
    actor: &AuthenticatedUser,
    dto: CreateTaskDto,
) -> Result<Task, AppError>
where
    B: BoardLookup + ?Sized,
    T: TaskWriter + ?Sized,
    U: UserLookup + ?Sized,
{
    dto.validate()?;
    let board = owned_board(boards, actor.id, dto.board_id).await?;
    if let Some(assignee) = dto.assigned_to {
        ensure_assignable(users, assignee).await?;
    }

    let task = match dto.position {
        Some(position) => tasks.insert(Task::new(dto, actor.id, position)).await?,
        None => tasks.append(Task::new(dto, actor.id, 0)).await?,
    };

    info!("task {} created on board {} by {}", task.id, board.id, actor.id);
    Ok(task)
}

pub async fn get_task<B, T>(
    boards: &B,
    tasks: &T,
    actor: &AuthenticatedUser,
    task_id: Uuid,
) -> Result<Task, AppError>
where
    B: BoardLookup + ?Sized,
    T: TaskLookup + ?Sized,
{
    visible_task(boards, tasks, actor, task_id).await
}

/// Lists tasks on the actor's boards. A `boardId` filter naming a board the
/// actor does not own is `NotFound`.
pub async fn list_tasks<B, T>(
    boards: &B,
    tasks: &T,
    actor: &AuthenticatedUser,
    query: TaskQuery,
) -> Result<Vec<Task>, AppError>
where
    B: BoardsByOwner + ?Sized,
    T: TaskFilterQuery + ?Sized,
{
    let board_ids: Vec<Uuid> = boards
        .list_by_owner(actor.id, None)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();

    if let Some(board_id) = query.board_id {
        if !board_ids.contains(&board_id) {
            return Err(AppError::NotFound("Board not found".into()));
        }
    }

    tasks.list(&board_ids, &query).await
}

pub async fn update_task<B, T, U>(
    boards: &B,
    tasks: &T,
    users: &U,
    actor: &AuthenticatedUser,
    task_id: Uuid,
    update: UpdateTaskDto,
) -> Result<Task, AppError>
where
    B: BoardLookup + ?Sized,
    T: TaskLookup + TaskWriter + ?Sized,
    U: UserLookup + ?Sized,
{
    update.validate()?;
    let mut task = visible_task(boards, tasks, actor, task_id).await?;

    if let Some(target) = update.board_id {
        if target != task.board_id {
            owned_board(boards, actor.id, target).await?;
        }
    }
    if let Some(assignee) = update.assigned_to {
        ensure_assignable(users, assignee).await?;
    }

    task.apply(update);
    tasks.update(task).await
}

pub async fn delete_task<B, T>(
    boards: &B,
    tasks: &T,
    actor: &AuthenticatedUser,
    task_id: Uuid,
) -> Result<(), AppError>
where
    B: BoardLookup + ?Sized,
    T: TaskLookup + TaskWriter + ?Sized,
{
    let task = visible_task(boards, tasks, actor, task_id).await?;
    if !tasks.delete(task.id).await? {
        return Err(task_not_found());
    }
    info!("task {} deleted by {}", task.id, actor.id);
    Ok(())
}
