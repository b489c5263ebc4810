#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Domain models and their validation rules, the segregated repository traits"]
#![doc = "with an in-memory implementation, authentication, the command handlers and"]
#![doc = "the actix-web routes of the TaskBoard API. The binary (`main.rs`) only loads"]
#![doc = "configuration and starts the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

pub use crate::error::AppError;
pub use crate::state::AppState;
