//! Command handlers.
//!
//! Each function validates its input, applies the ownership and permission
//! rules, and talks to the repositories through the narrowest traits it needs.
//! Route handlers only translate between HTTP and these functions.

pub mod auth;
pub mod boards;
pub mod tasks;
pub mod users;
