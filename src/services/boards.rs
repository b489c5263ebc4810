use log::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{Board, BoardQuery, CreateBoardCommand, CreateBoardDto, UpdateBoardDto};
use crate::repository::{BoardLookup, BoardWriter, BoardsByOwner};
use crate::validation::normalize_search;

/// Loads a board owned by `owner_id`. Boards of other users are reported as
/// missing so their existence is not leaked.
pub(crate) async fn owned_board<R>(boards: &R, owner_id: Uuid, board_id: Uuid) -> Result<Board, AppError>
where
    R: BoardLookup + ?Sized,
{
    match boards.find_by_id(board_id).await? {
        Some(board) if board.owner_id == owner_id => Ok(board),
        _ => Err(AppError::NotFound("Board not found".into())),
    }
}

pub async fn create_board<R>(
    boards: &R,
    actor: &AuthenticatedUser,
    dto: CreateBoardDto,
) -> Result<Board, AppError>
where
    R: BoardWriter + ?Sized,
{
    let command = CreateBoardCommand::from_dto(dto, actor.id);
    command.validate()?;

    let board = boards.insert(Board::new(command)).await?;
    info!("board {} created by {}", board.id, actor.id);
    Ok(board)
}

pub async fn get_board<R>(
    boards: &R,
    actor: &AuthenticatedUser,
    board_id: Uuid,
) -> Result<Board, AppError>
where
    R: BoardLookup + ?Sized,
{
    owned_board(boards, actor.id, board_id).await
}

pub async fn list_boards<R>(
    boards: &R,
    actor: &AuthenticatedUser,
    query: BoardQuery,
) -> Result<Vec<Board>, AppError>
where
    R: BoardsByOwner + ?Sized,
{
    let search = normalize_search(query.search.as_deref());
    boards.list_by_owner(actor.id, search.as_deref()).await
}

pub async fn update_board<R>(
    boards: &R,
    actor: &AuthenticatedUser,
    board_id: Uuid,
    update: UpdateBoardDto,
) -> Result<Board, AppError>
where
    R: BoardLookup + BoardWriter + ?Sized,
{
    update.validate()?;
    let mut board = owned_board(boards, actor.id, board_id).await?;
    board.apply(update);
    boards.update(board).await
}

/// Deletes a board and every task on it.
pub async fn delete_board<R>(
    boards: &R,
    actor: &AuthenticatedUser,
    board_id: Uuid,
) -> Result<(), AppError>
where
    R: BoardLookup + BoardWriter + ?Sized,
{
    let board = owned_board(boards, actor.id, board_id).await?;
    if !boards.delete(board.id).await? {
        return Err(AppError::NotFound("Board not found".into()));
    }
    info!("board {} deleted by {}", board.id, actor.id);
    Ok(())
}
