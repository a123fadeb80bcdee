//! 测试公共模块
//! 提供测试配置、内存存储的应用状态和测试用户

#![allow(dead_code)]

use secrecy::Secret;
use std::sync::Arc;
use survey_service::{
    auth::password::PasswordHasher,
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    middleware::AppState,
    models::user::{AgeRange, Gender, NewUser},
    repository::{CredentialStore, InMemoryUserStore},
};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置（内存存储，低成本 Argon2 参数）
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            backend: "memory".to_string(),
            url: None,
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
            jwt_algorithm: "HS256".to_string(),
            access_token_exp_secs: 1800,
            leeway_secs: 0,
            password_min_length: 8,
            password_require_digit: true,
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        },
    }
}

/// 测试哈希器，与测试配置的参数一致
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("valid argon2 params")
}

/// 创建测试应用状态，同时返回底层存储以便直接操作
pub fn create_test_app_state() -> (Arc<AppState>, Arc<InMemoryUserStore>) {
    let store = Arc::new(InMemoryUserStore::new());
    let state = AppState::new(&create_test_config(), store.clone()).expect("Failed to build state");

    (Arc::new(state), store)
}

/// 创建测试用户，返回用户 ID
pub async fn create_test_user(store: &InMemoryUserStore, email: &str, password: &str) -> i64 {
    let password_hash = test_hasher().hash(password).expect("Failed to hash password");

    store
        .insert(NewUser {
            email: email.to_string(),
            password_hash,
            full_name: "Test User".to_string(),
            gender: Gender::Male,
            age: AgeRange::From21To25,
            education: Some("Bachelor".to_string()),
            income_bracket: None,
            phone_number: None,
            profile_pic: None,
        })
        .await
        .expect("Failed to create test user")
        .id
}
