//! Millionaire catalogue API server library.
//!
//! Exposes configuration, state, services, error handling and routes so
//! the binary entrypoint and the integration tests build the same app.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mail;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
