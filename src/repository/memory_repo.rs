//! In-memory credential store

use super::CredentialStore;
use crate::{
    error::AppError,
    models::user::{NewUser, User},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    users: HashMap<i64, User>,
    next_id: i64,
}

/// Process-local store; contents are lost on restart
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the active flag of a record, returning whether it existed
    pub async fn set_active(&self, id: i64, active: bool) -> bool {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.is_active = active;
                user.updated_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Remove a record, returning whether it existed
    pub async fn remove(&self, id: i64) -> bool {
        self.inner.write().await.users.remove(&id).is_some()
    }
}

#[async_trait]
impl CredentialStore for InMemoryUserStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == identifier).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        inner.next_id += 1;
        let record = User {
            id: inner.next_id,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            gender: user.gender.as_str().to_string(),
            age: user.age.as_str().to_string(),
            education: user.education,
            income_bracket: user.income_bracket,
            phone_number: user.phone_number,
            profile_pic: user.profile_pic,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.users.insert(record.id, record.clone());

        Ok(record)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
