//! Users Domain
//!
//! CRUD over a single `users` table, keyed by a client-assigned string id.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, outcome → status mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Delegation + tracing spans
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait, PostgreSQL and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User, WriteOutcome, column table
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = axum::Router::new().nest("/users", handlers::router(service));
//! ```

pub mod columns;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{User, UserPatch, WriteOutcome};
pub use postgres::PostgresUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
