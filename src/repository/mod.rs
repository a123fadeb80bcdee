//! Credential store layer
//!
//! The authentication core only talks to `CredentialStore`. Postgres backs it
//! in production; the in-memory store serves the minimal deployment and tests.

pub mod memory_repo;
pub mod user_repo;

pub use memory_repo::InMemoryUserStore;
pub use user_repo::UserRepository;

use crate::{
    error::AppError,
    models::user::{NewUser, User},
};
use async_trait::async_trait;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a record by login identifier (email)
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, AppError>;

    /// Look up a record by numeric id
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Insert a new record. Duplicate identifiers are a `BadRequest`.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    /// Readiness check
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Backend name for health reporting
    fn backend(&self) -> &'static str;
}
