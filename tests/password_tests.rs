//! 密码哈希功能测试
//!
//! 测试 Argon2id 哈希、校验和密码策略

use survey_service::auth::password::PasswordHasher;
use survey_service::error::AppError;

mod common;
use common::{create_test_config, test_hasher};

const SAMPLES: [&str; 5] = ["TestPass123", "", "correct horse battery staple", "密码Passw0rd", "a"];

#[test]
fn test_hash_then_verify_for_all_samples() {
    let hasher = test_hasher();

    for password in SAMPLES {
        let hash = hasher.hash(password).unwrap();
        assert!(hasher.verify(password, &hash), "failed for {password:?}");
    }
}

#[test]
fn test_same_password_yields_distinct_digests() {
    let hasher = test_hasher();
    let password = "TestPass123";

    let first = hasher.hash(password).unwrap();
    let second = hasher.hash(password).unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify(password, &first));
    assert!(hasher.verify(password, &second));
}

#[test]
fn test_different_password_never_verifies() {
    let hasher = test_hasher();

    for (i, p1) in SAMPLES.iter().enumerate() {
        let hash = hasher.hash(p1).unwrap();
        for (j, p2) in SAMPLES.iter().enumerate() {
            if i != j {
                assert!(!hasher.verify(p2, &hash), "{p2:?} verified against hash of {p1:?}");
            }
        }
    }
}

#[test]
fn test_digest_is_argon2id_phc_string() {
    let hash = test_hasher().hash("TestPass123").unwrap();

    assert!(hash.starts_with("$argon2id$"));
    assert!(hash.contains("m=1024,t=1,p=1"));
}

#[test]
fn test_verify_uses_parameters_embedded_in_digest() {
    // 以默认参数校验低成本参数生成的摘要
    let cheap = test_hasher().hash("TestPass123").unwrap();
    let hasher = PasswordHasher::new();

    assert!(hasher.verify("TestPass123", &cheap));
}

#[test]
fn test_malformed_digest_returns_false() {
    let hasher = test_hasher();

    for digest in [
        "",
        "not-a-hash",
        "$argon2id$",
        "$2b$12$KIXQJv3qjG0xN9yTQYzJ8eHc1W9l6v0rH4Yb0m5hT5gq3f4Q0hZ1e",
    ] {
        assert!(!hasher.verify("TestPass123", digest), "{digest:?}");
    }
}

#[test]
fn test_dummy_digest_rejects_real_passwords() {
    let hasher = test_hasher();
    let dummy = hasher.dummy_digest().unwrap();

    for password in SAMPLES {
        assert!(!hasher.verify(password, &dummy));
    }
}

#[test]
fn test_invalid_params_rejected() {
    assert!(matches!(PasswordHasher::with_params(1, 1, 1), Err(AppError::Config(_))));
}

#[test]
fn test_password_policy() {
    let config = create_test_config();

    assert!(PasswordHasher::validate_password_policy("TestPass123", &config.security).is_ok());
    assert!(PasswordHasher::validate_password_policy("Short1", &config.security).is_err());
    assert!(PasswordHasher::validate_password_policy("NoDigitsHere", &config.security).is_err());
}

#[test]
fn test_password_policy_without_digit_requirement() {
    let mut config = create_test_config();
    config.security.password_require_digit = false;

    assert!(PasswordHasher::validate_password_policy("NoDigitsHere", &config.security).is_ok());
}
