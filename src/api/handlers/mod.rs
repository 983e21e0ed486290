//! API handlers for Flock.
//!
//! This module organizes the service's route handlers: account and session
//! endpoints under `auth`, self-service under `me`, and the follow graph
//! under `users`. `error` holds the shared failure taxonomy.

pub mod auth;
pub mod error;
pub mod health;
pub mod me;
pub mod root;
pub mod users;
