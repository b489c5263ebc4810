use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{not_blank, not_nil, trimmed, trimmed_opt};

/// Represents the priority of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
    /// Urgent priority.
    Urgent,
}

/// Represents the status of a task, i.e. the board column it sits in.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed and under review.
    Review,
    /// Task is completed.
    Done,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskDto {
    /// The board the task is added to.
    #[serde(default)]
    #[validate(custom = "not_nil")]
    pub board_id: Uuid,

    /// Must be between 1 and 200 characters once trimmed.
    #[serde(deserialize_with = "trimmed")]
    #[validate(
        custom = "not_blank",
        length(max = 200, message = "El título no puede exceder 200 caracteres")
    )]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000, message = "La descripción no puede exceder 1000 caracteres"))]
    pub description: Option<String>,

    pub priority: Option<TaskPriority>,

    /// Defaults to `todo`.
    #[serde(default)]
    pub status: TaskStatus,

    pub due_date: Option<DateTime<Utc>>,

    /// Defaults to the end of the board.
    #[validate(range(
        min = 0,
        max = 1000000,
        message = "La posición debe estar entre 0 y 1000000"
    ))]
    pub position: Option<i32>,

    pub assigned_to: Option<Uuid>,
}

/// Partial task update. Absent fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskDto {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(
        custom = "not_blank",
        length(max = 200, message = "El título no puede exceder 200 caracteres")
    )]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "La descripción no puede exceder 1000 caracteres"))]
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(range(
        min = 0,
        max = 1000000,
        message = "La posición debe estar entre 0 y 1000000"
    ))]
    pub position: Option<i32>,
    pub assigned_to: Option<Uuid>,
    /// Moves the task to another board of the same owner.
    pub board_id: Option<Uuid>,
}

/// Represents a task entity as held by the repositories and returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// Order of the task inside its board.
    pub position: i32,
    pub assigned_to: Option<Uuid>,
    /// Identifier of the user who created the task.
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents query parameters for filtering tasks when listing them.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub board_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Filter tasks by assignee's user ID.
    pub assigned_to: Option<Uuid>,
    /// Search term matched against titles and descriptions (case-insensitive).
    pub search: Option<String>,
}

impl Task {
    /// Creates a new `Task` from validated input. `position` is resolved by the caller.
    pub fn new(input: CreateTaskDto, created_by: Uuid, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id: input.board_id,
            title: input.title.trim().to_string(),
            description: input.description,
            priority: input.priority,
            status: input.status,
            due_date: input.due_date,
            position,
            assigned_to: input.assigned_to,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateTaskDto) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if update.priority.is_some() {
            self.priority = update.priority;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if update.due_date.is_some() {
            self.due_date = update.due_date;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if update.assigned_to.is_some() {
            self.assigned_to = update.assigned_to;
        }
        if let Some(board_id) = update.board_id {
            self.board_id = board_id;
        }
        self.updated_at = Utc::now();
    }

    pub fn matches(&self, query: &TaskQuery, search: Option<&str>) -> bool {
        query.board_id.map_or(true, |b| self.board_id == b)
            && query.status.map_or(true, |s| self.status == s)
            && query.priority.map_or(true, |p| self.priority == Some(p))
            && query.assigned_to.map_or(true, |a| self.assigned_to == Some(a))
            && search.map_or(true, |term| {
                self.title.to_lowercase().contains(term)
                    || self
                        .description
                        .as_deref()
                        .map_or(false, |d| d.to_lowercase().contains(term))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> CreateTaskDto {
        CreateTaskDto {
            board_id: Uuid::new_v4(),
            title: title.to_string(),
            description: Some("Test Description".to_string()),
            priority: Some(TaskPriority::High),
            status: TaskStatus::Todo,
            due_date: Some(Utc::now()),
            position: None,
            assigned_to: None,
        }
    }

    #[test]
    fn test_task_creation() {
        let creator = Uuid::new_v4();
        let task = Task::new(input("Test Task"), creator, 3);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.created_by, creator);
        assert_eq!(task.position, 3);
        assert!(task.assigned_to.is_none());
    }

    #[test]
    fn test_task_input_validation() {
        assert!(input("Valid Task").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let mut long_description = input("Valid title");
        long_description.description = Some("b".repeat(1001));
        assert!(long_description.validate().is_err());

        let mut no_board = input("Valid title");
        no_board.board_id = Uuid::nil();
        let errors = no_board.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("board_id"));

        let mut negative = input("Valid title");
        negative.position = Some(-1);
        assert!(negative.validate().is_err());

        let mut huge = input("Valid title");
        huge.position = Some(i32::MAX);
        assert!(huge.validate().is_err());
        huge.position = Some(1_000_000);
        assert!(huge.validate().is_ok());
    }

    #[test]
    fn test_title_length_counts_trimmed_text() {
        let body = serde_json::json!({
            "boardId": Uuid::new_v4(),
            "title": format!("  {}  ", "a".repeat(200)),
        });
        let dto: CreateTaskDto = serde_json::from_value(body).unwrap();
        assert_eq!(dto.title.len(), 200);
        assert!(dto.validate().is_ok());

        let update: UpdateTaskDto =
            serde_json::from_value(serde_json::json!({ "title": format!(" {} ", "a".repeat(200)) }))
                .unwrap();
        assert!(update.validate().is_ok());
        let untouched: UpdateTaskDto = serde_json::from_str("{}").unwrap();
        assert!(untouched.title.is_none());
    }

    #[test]
    fn test_status_defaults_to_todo() {
        let dto: CreateTaskDto = serde_json::from_str(
            r#"{"boardId": "6f1c1f4e-8d2a-4c1e-9a49-3f1d2b7a9c10", "title": "Write docs"}"#,
        )
        .unwrap();
        assert_eq!(dto.status, TaskStatus::Todo);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            "in_progress"
        );
        assert_eq!(serde_json::to_value(TaskPriority::Urgent).unwrap(), "urgent");
    }

    #[test]
    fn test_apply_and_matches() {
        let mut task = Task::new(input("Fix login"), Uuid::new_v4(), 0);
        task.apply(UpdateTaskDto {
            status: Some(TaskStatus::Done),
            ..Default::default()
        });
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.title, "Fix login");

        let query = TaskQuery {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        assert!(task.matches(&query, Some("login")));
        assert!(task.matches(&query, Some("description")));
        assert!(!task.matches(&query, Some("signup")));

        let other_board = TaskQuery {
            board_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!task.matches(&other_board, None));
    }
}
