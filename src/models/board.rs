use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation::{rule, trimmed, trimmed_opt};

/// A board groups tasks and belongs to exactly one user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn board_title_required(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(rule("required", "El título del tablero es obligatorio"));
    }
    Ok(())
}

fn board_owner_required(owner_id: &Uuid) -> Result<(), ValidationError> {
    if owner_id.is_nil() {
        return Err(rule("required", "El propietario del tablero es obligatorio"));
    }
    Ok(())
}

/// Request body for creating a board. The owner comes from the token.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardDto {
    #[serde(default, deserialize_with = "trimmed")]
    pub title: String,
    pub description: Option<String>,
}

/// Validated command that creates a board.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardCommand {
    #[validate(
        custom = "board_title_required",
        length(max = 100, message = "El título no puede exceder 100 caracteres")
    )]
    pub title: String,
    #[validate(length(max = 300, message = "La descripción no puede exceder 300 caracteres"))]
    pub description: Option<String>,
    #[validate(custom = "board_owner_required")]
    pub owner_id: Uuid,
}

impl CreateBoardCommand {
    pub fn from_dto(dto: CreateBoardDto, owner_id: Uuid) -> Self {
        Self {
            title: dto.title.trim().to_string(),
            description: dto.description,
            owner_id,
        }
    }
}

/// Partial board update. Absent fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardDto {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(
        custom = "board_title_required",
        length(max = 100, message = "El título no puede exceder 100 caracteres")
    )]
    pub title: Option<String>,
    #[validate(length(max = 300, message = "La descripción no puede exceder 300 caracteres"))]
    pub description: Option<String>,
}

/// Query parameters for listing boards.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct BoardQuery {
    /// Matches title or description (case-insensitive).
    pub search: Option<String>,
}

impl Board {
    /// Builds a board from a command that has already passed validation.
    pub fn new(command: CreateBoardCommand) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: command.title.trim().to_string(),
            description: command.description,
            owner_id: command.owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateBoardDto) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        self.updated_at = Utc::now();
    }

    pub fn matches(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(term)
            || self
                .description
                .as_deref()
                .map_or(false, |d| d.to_lowercase().contains(term))
    }
}
