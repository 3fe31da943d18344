//! Owner and statistics API server for the Birdwatch backend.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Registration** of users and example accounts (`POST /users`,
//!   `POST /example`)
//! - **Owner updates** behind HTTP Basic authentication
//!   (`PUT /{prefix}/{id}`)
//! - **Observation statistics** for the authenticated owner
//!   (`GET /{prefix}/stats`), computed by `birdwatch-stats`
//! - **Observation recording** (`POST /{prefix}/observations`)
//!
//! # Architecture
//!
//! Handlers build an [`OwnerService`] from the shared [`AppState`], which
//! holds the [`OwnerRepository`] and the [`PasswordEncoder`]. The
//! repository is either `PostgreSQL` (reads on the replica, writes on the
//! primary) or an in-memory store used by tests and local runs.
//!
//! [`OwnerService`]: service::OwnerService
//! [`OwnerRepository`]: repository::OwnerRepository
//! [`PasswordEncoder`]: password::PasswordEncoder

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod password;
pub mod repository;
pub mod router;
pub mod server;
pub mod service;
pub mod state;

// Re-export primary types for convenience.
pub use config::{AppConfig, ConfigError, StorageBackend};
pub use error::ApiError;
pub use password::{BcryptPasswordEncoder, PasswordEncoder, PasswordError};
pub use repository::OwnerRepository;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
