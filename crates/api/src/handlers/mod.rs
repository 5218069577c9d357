//! Request handlers.
//!
//! Handlers decode and validate requests, call the services on
//! [`AppState`](crate::state::AppState), and map results to JSON responses
//! or [`AppError`](crate::error::AppError).

pub mod feedback;
pub mod health;
pub mod home;
pub mod millionaire;
pub mod photo;
