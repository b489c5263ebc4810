//! Data access contracts.
//!
//! Reads are split into narrow query traits so a command handler only asks for
//! the lookups it actually performs (`login` needs `UserByEmail` and
//! `UserByUsername`, not the whole user store). The `*Repository` traits bundle
//! everything for wiring into `AppState`; any type implementing the parts gets
//! them through the blanket impls.
//!
//! Errors are `AppError`, so uniqueness violations surface as `Conflict`.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Board, Task, TaskQuery, User};

pub use memory::InMemoryStore;

#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait UserByEmail: Send + Sync {
    /// Case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait UserByUsername: Send + Sync {
    /// Case-insensitive.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait UserSearch: Send + Sync {
    /// Users whose username, email or full name contains `term` (already
    /// lowercased), ordered by username.
    async fn search(&self, term: &str) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait UserByStatus: Send + Sync {
    /// Users with the given active flag, or every user for `None`, ordered by
    /// username. Read from a single snapshot.
    async fn list_by_active(&self, is_active: Option<bool>) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait UserWriter: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, AppError>;
    async fn update(&self, user: User) -> Result<User, AppError>;
    /// Also removes the user's boards with their tasks and clears assignments
    /// pointing at the user. Returns `false` if nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub trait UserRepository:
    UserLookup + UserByEmail + UserByUsername + UserSearch + UserByStatus + UserWriter
{
}

impl<T> UserRepository for T where
    T: UserLookup + UserByEmail + UserByUsername + UserSearch + UserByStatus + UserWriter
{
}

#[async_trait]
pub trait BoardLookup: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Board>, AppError>;
}

#[async_trait]
pub trait BoardsByOwner: Send + Sync {
    /// Newest first. `search` is already lowercased.
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Board>, AppError>;
}

#[async_trait]
pub trait BoardWriter: Send + Sync {
    async fn insert(&self, board: Board) -> Result<Board, AppError>;
    async fn update(&self, board: Board) -> Result<Board, AppError>;
    /// Also removes the board's tasks.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub trait BoardRepository: BoardLookup + BoardsByOwner + BoardWriter {}

impl<T> BoardRepository for T where T: BoardLookup + BoardsByOwner + BoardWriter {}

#[async_trait]
pub trait TaskLookup: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError>;
}

#[async_trait]
pub trait TaskFilterQuery: Send + Sync {
    /// Tasks on any of `board_ids` matching `query`, ordered by position then
    /// creation time.
    async fn list(&self, board_ids: &[Uuid], query: &TaskQuery) -> Result<Vec<Task>, AppError>;
}

#[async_trait]
pub trait TaskWriter: Send + Sync {
    /// Stores the task at the position it carries.
    async fn insert(&self, task: Task) -> Result<Task, AppError>;
    /// Stores the task right after the last task of its board. The position
    /// is resolved under the same write as the insert.
    async fn append(&self, task: Task) -> Result<Task, AppError>;
    async fn update(&self, task: Task) -> Result<Task, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub trait TaskRepository: TaskLookup + TaskFilterQuery + TaskWriter {}

impl<T> TaskRepository for T where T: TaskLookup + TaskFilterQuery + TaskWriter {}
