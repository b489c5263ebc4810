//! In-process implementation of every repository trait.
//!
//! Holds all three collections behind one lock so cascading deletes and
//! uniqueness checks see a consistent view.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    BoardLookup, BoardWriter, BoardsByOwner, TaskFilterQuery, TaskLookup, TaskWriter,
    UserByEmail, UserByStatus, UserByUsername, UserLookup, UserSearch, UserWriter,
};
use crate::error::AppError;
use crate::models::{Board, Task, TaskQuery, User};
use crate::validation::normalize_search;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    boards: HashMap<Uuid, Board>,
    tasks: HashMap<Uuid, Task>,
}

/// Email and username comparison key. Full Unicode case folding, matching
/// how `User` stores emails.
fn lookup_key(value: &str) -> String {
    value.trim().to_lowercase()
}

impl Tables {
    /// Rejects an email or username already used by another account.
    fn check_unique(&self, user: &User) -> Result<(), AppError> {
        let email = lookup_key(&user.email);
        let username = lookup_key(&user.username);
        for other in self.users.values().filter(|u| u.id != user.id) {
            if lookup_key(&other.email) == email {
                return Err(AppError::Conflict("Email already registered".into()));
            }
            if lookup_key(&other.username) == username {
                return Err(AppError::Conflict("Username already taken".into()));
            }
        }
        Ok(())
    }

    /// Position right after the last task of the board.
    fn next_position(&self, board_id: Uuid) -> Result<i32, AppError> {
        let last = self
            .tasks
            .values()
            .filter(|t| t.board_id == board_id)
            .map(|t| t.position)
            .max();
        match last {
            None => Ok(0),
            Some(last) => last
                .checked_add(1)
                .ok_or_else(|| AppError::BadRequest("Board has no free position left".into())),
        }
    }

    fn remove_board(&mut self, board_id: Uuid) -> bool {
        if self.boards.remove(&board_id).is_none() {
            return false;
        }
        self.tasks.retain(|_, t| t.board_id != board_id);
        true
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_username(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| a.username.to_lowercase().cmp(&b.username.to_lowercase()));
    users
}

#[async_trait]
impl UserLookup for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl UserByEmail for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = lookup_key(email);
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| lookup_key(&u.email) == email)
            .cloned())
    }
}

#[async_trait]
impl UserByUsername for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let username = lookup_key(username);
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| lookup_key(&u.username) == username)
            .cloned())
    }
}

#[async_trait]
impl UserSearch for InMemoryStore {
    async fn search(&self, term: &str) -> Result<Vec<User>, AppError> {
        let Some(term) = normalize_search(Some(term)) else {
            return Ok(Vec::new());
        };
        let tables = self.tables.read().await;
        let found = tables
            .users
            .values()
            .filter(|u| {
                u.username.to_lowercase().contains(&term)
                    || u.email.contains(&term)
                    || u.full_name.to_lowercase().contains(&term)
            })
            .cloned()
            .collect();
        Ok(sorted_by_username(found))
    }
}

#[async_trait]
impl UserByStatus for InMemoryStore {
    async fn list_by_active(&self, is_active: Option<bool>) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        let found = tables
            .users
            .values()
            .filter(|u| is_active.map_or(true, |active| u.is_active == active))
            .cloned()
            .collect();
        Ok(sorted_by_username(found))
    }
}

#[async_trait]
impl UserWriter for InMemoryStore {
    async fn insert(&self, user: User) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_unique(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(AppError::NotFound("User not found".into()));
        }
        tables.check_unique(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<Uuid> = tables
            .boards
            .values()
            .filter(|b| b.owner_id == id)
            .map(|b| b.id)
            .collect();
        for board_id in owned {
            tables.remove_board(board_id);
        }
        for task in tables.tasks.values_mut() {
            if task.assigned_to == Some(id) {
                task.assigned_to = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl BoardLookup for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Board>, AppError> {
        Ok(self.tables.read().await.boards.get(&id).cloned())
    }
}

#[async_trait]
impl BoardsByOwner for InMemoryStore {
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Board>, AppError> {
        let tables = self.tables.read().await;
        let mut boards: Vec<Board> = tables
            .boards
            .values()
            .filter(|b| b.owner_id == owner_id)
            .filter(|b| search.map_or(true, |term| b.matches(term)))
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }
}

#[async_trait]
impl BoardWriter for InMemoryStore {
    async fn insert(&self, board: Board) -> Result<Board, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&board.owner_id) {
            return Err(AppError::BadRequest("Board owner does not exist".into()));
        }
        tables.boards.insert(board.id, board.clone());
        Ok(board)
    }

    async fn update(&self, board: Board) -> Result<Board, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.boards.contains_key(&board.id) {
            return Err(AppError::NotFound("Board not found".into()));
        }
        tables.boards.insert(board.id, board.clone());
        Ok(board)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.remove_board(id))
    }
}

#[async_trait]
impl TaskLookup for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }
}

#[async_trait]
impl TaskFilterQuery for InMemoryStore {
    async fn list(&self, board_ids: &[Uuid], query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let search = normalize_search(query.search.as_deref());
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| board_ids.contains(&t.board_id))
            .filter(|t| t.matches(query, search.as_deref()))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(tasks)
    }
}

#[async_trait]
impl TaskWriter for InMemoryStore {
    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.boards.contains_key(&task.board_id) {
            return Err(AppError::BadRequest("Board does not exist".into()));
        }
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn append(&self, mut task: Task) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.boards.contains_key(&task.board_id) {
            return Err(AppError::BadRequest("Board does not exist".into()));
        }
        task.position = tables.next_position(task.board_id)?;
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.contains_key(&task.id) {
            return Err(AppError::NotFound("Task not found".into()));
        }
        if !tables.boards.contains_key(&task.board_id) {
            return Err(AppError::BadRequest("Board does not exist".into()));
        }
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateBoardCommand, CreateTaskDto, TaskStatus, UserRole};
    use pretty_assertions::assert_eq;

    fn user(username: &str, email: &str) -> User {
        User::new(
            username.into(),
            email.into(),
            format!("{} Full", username),
            "hash".into(),
            UserRole::User,
        )
    }

    fn board(owner_id: Uuid, title: &str) -> Board {
        Board::new(CreateBoardCommand {
            title: title.into(),
            description: None,
            owner_id,
        })
    }

    fn task(board_id: Uuid, title: &str, position: i32) -> Task {
        Task::new(
            CreateTaskDto {
                board_id,
                title: title.into(),
                description: None,
                priority: None,
                status: TaskStatus::Todo,
                due_date: None,
                position: None,
                assigned_to: None,
            },
            Uuid::new_v4(),
            position,
        )
    }

    #[tokio::test]
    async fn test_user_lookups_are_case_insensitive() {
        let store = InMemoryStore::new();
        let alice = UserWriter::insert(&store, user("Alice", "alice@example.com"))
            .await
            .unwrap();

        let by_email = store.find_by_email("ALICE@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(alice.id));

        let by_username = store.find_by_username("alice").await.unwrap();
        assert_eq!(by_username.map(|u| u.id), Some(alice.id));

        assert!(store.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_email_lookup_folds_non_ascii_case() {
        let store = InMemoryStore::new();
        let elise = UserWriter::insert(&store, user("elise", "elise@MÜNCHEN.de"))
            .await
            .unwrap();
        assert_eq!(elise.email, "elise@münchen.de");

        for spelling in ["elise@MÜNCHEN.de", "Elise@München.DE", "elise@münchen.de"] {
            let found = store.find_by_email(spelling).await.unwrap();
            assert_eq!(found.map(|u| u.id), Some(elise.id), "{}", spelling);
        }

        let duplicate = UserWriter::insert(&store, user("other", "ELISE@münchen.de")).await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = InMemoryStore::new();
        UserWriter::insert(&store, user("alice", "alice@example.com"))
            .await
            .unwrap();

        let same_email = UserWriter::insert(&store, user("other", "Alice@Example.com")).await;
        assert!(matches!(same_email, Err(AppError::Conflict(_))));

        let same_username = UserWriter::insert(&store, user("ALICE", "x@example.com")).await;
        assert!(matches!(same_username, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_search_and_status_queries() {
        let store = InMemoryStore::new();
        UserWriter::insert(&store, user("zoe", "zoe@example.com"))
            .await
            .unwrap();
        UserWriter::insert(&store, user("adam", "adam@corp.io"))
            .await
            .unwrap();
        let mut carl = user("carl", "carl@corp.io");
        carl.is_active = false;
        UserWriter::insert(&store, carl).await.unwrap();

        let corp: Vec<String> = store
            .search("CORP")
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(corp, vec!["adam".to_string(), "carl".to_string()]);
        assert!(store.search("  ").await.unwrap().is_empty());

        let active: Vec<String> = store
            .list_by_active(Some(true))
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(active, vec!["adam".to_string(), "zoe".to_string()]);
        assert_eq!(store.list_by_active(Some(false)).await.unwrap().len(), 1);

        let everyone: Vec<String> = store
            .list_by_active(None)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(everyone, vec!["adam", "carl", "zoe"]);
    }

    #[tokio::test]
    async fn test_deleting_board_removes_tasks() {
        let store = InMemoryStore::new();
        let owner = UserWriter::insert(&store, user("owner", "owner@example.com"))
            .await
            .unwrap();
        let b = BoardWriter::insert(&store, board(owner.id, "Main")).await.unwrap();
        let t = TaskWriter::insert(&store, task(b.id, "One", 0)).await.unwrap();

        assert!(BoardWriter::delete(&store, b.id).await.unwrap());
        assert!(TaskLookup::find_by_id(&store, t.id).await.unwrap().is_none());
        assert!(!BoardWriter::delete(&store, b.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let store = InMemoryStore::new();
        let owner = UserWriter::insert(&store, user("owner", "owner@example.com"))
            .await
            .unwrap();
        let helper = UserWriter::insert(&store, user("helper", "helper@example.com"))
            .await
            .unwrap();
        let owned = BoardWriter::insert(&store, board(owner.id, "Owned")).await.unwrap();
        let other = BoardWriter::insert(&store, board(helper.id, "Other")).await.unwrap();
        let mut assigned = task(other.id, "Assigned", 0);
        assigned.assigned_to = Some(owner.id);
        let assigned = TaskWriter::insert(&store, assigned).await.unwrap();

        assert!(UserWriter::delete(&store, owner.id).await.unwrap());

        assert!(BoardLookup::find_by_id(&store, owned.id)
            .await
            .unwrap()
            .is_none());
        let kept = TaskLookup::find_by_id(&store, assigned.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.assigned_to, None);
    }

    #[tokio::test]
    async fn test_task_listing_order_and_position() {
        let store = InMemoryStore::new();
        let owner = UserWriter::insert(&store, user("owner", "owner@example.com"))
            .await
            .unwrap();
        let b = BoardWriter::insert(&store, board(owner.id, "Main")).await.unwrap();

        let first = store.append(task(b.id, "Zeroth", 42)).await.unwrap();
        assert_eq!(first.position, 0);
        TaskWriter::insert(&store, task(b.id, "Second", 5)).await.unwrap();
        TaskWriter::insert(&store, task(b.id, "First", 1)).await.unwrap();
        let last = store.append(task(b.id, "Last", 0)).await.unwrap();
        assert_eq!(last.position, 6);

        let titles: Vec<String> = store
            .list(&[b.id], &TaskQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Zeroth", "First", "Second", "Last"]);

        assert!(store
            .list(&[], &TaskQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_append_after_max_position_is_rejected() {
        let store = InMemoryStore::new();
        let owner = UserWriter::insert(&store, user("owner", "owner@example.com"))
            .await
            .unwrap();
        let b = BoardWriter::insert(&store, board(owner.id, "Main")).await.unwrap();
        TaskWriter::insert(&store, task(b.id, "At the edge", i32::MAX))
            .await
            .unwrap();

        let result = store.append(task(b.id, "One more", 0)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(
            store.list(&[b.id], &TaskQuery::default()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_get_distinct_positions() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        let owner = UserWriter::insert(&*store, user("owner", "owner@example.com"))
            .await
            .unwrap();
        let board_id = BoardWriter::insert(&*store, board(owner.id, "Busy"))
            .await
            .unwrap()
            .id;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.append(task(board_id, &format!("T{}", i), 0)).await
                })
            })
            .collect();
        let mut positions = Vec::new();
        for handle in handles {
            positions.push(handle.await.unwrap().unwrap().position);
        }
        positions.sort();
        assert_eq!(positions, (0..16).collect::<Vec<i32>>());
    }

    #[tokio::test]
    async fn test_task_insert_requires_board() {
        let store = InMemoryStore::new();
        let result = TaskWriter::insert(&store, task(Uuid::new_v4(), "Orphan", 0)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        let appended = store.append(task(Uuid::new_v4(), "Orphan", 0)).await;
        assert!(matches!(appended, Err(AppError::BadRequest(_))));
    }
}
