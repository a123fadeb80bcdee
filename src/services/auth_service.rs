//! 认证服务：注册、凭据校验、登录签发令牌

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::SecurityConfig,
    error::{AppError, AuthError},
    models::{auth::LoginResponse, user::*},
    repository::CredentialStore,
};
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt_service: Arc<JwtService>,
    hasher: Arc<PasswordHasher>,
    security: SecurityConfig,
    /// Verified against when the identifier is unknown
    dummy_digest: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        jwt_service: Arc<JwtService>,
        hasher: Arc<PasswordHasher>,
        security: SecurityConfig,
    ) -> Result<Self, AppError> {
        let dummy_digest = hasher.dummy_digest()?;

        Ok(Self {
            store,
            jwt_service,
            hasher,
            security,
            dummy_digest,
        })
    }

    /// 校验凭据
    ///
    /// Unknown identifier, inactive account and wrong password all return
    /// `Ok(None)`. Each of those paths performs exactly one hash verification
    /// so response latency does not reveal whether the identifier exists.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<Principal>, AppError> {
        let user = self.store.find_by_identifier(identifier).await?;

        let digest = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| self.dummy_digest.clone());
        let verified = self.verify_off_thread(password, digest).await?;

        match user {
            Some(user) if verified && user.is_active => Ok(Some(Principal::from(user))),
            Some(user) if verified => {
                tracing::debug!(user_id = user.id, "Login attempt on inactive account");
                Ok(None)
            }
            Some(_) => Ok(None),
            None => {
                tracing::debug!("Login attempt for unknown identifier");
                Ok(None)
            }
        }
    }

    /// 用户登录
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, AppError> {
        let principal = match self.authenticate(identifier, password).await? {
            Some(principal) => principal,
            None => {
                metrics::counter!("auth_login_total", "outcome" => "failure").increment(1);
                return Err(AuthError::BadCredentials.into());
            }
        };

        let access_token = self
            .jwt_service
            .issue_for_subject(principal.user_id.to_string())?;

        metrics::counter!("auth_login_total", "outcome" => "success").increment(1);
        tracing::info!(user_id = principal.user_id, "User logged in");

        Ok(LoginResponse::bearer(
            access_token,
            self.jwt_service.default_ttl().as_secs(),
        ))
    }

    /// 用户注册
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AppError> {
        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, &self.security)?;

        // 提前检查，避免无谓的哈希计算；唯一约束仍由存储层兜底
        if self.store.find_by_identifier(&req.email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = self.hash_off_thread(req.password).await?;

        let user = self
            .store
            .insert(NewUser {
                email: req.email,
                password_hash,
                full_name: req.full_name,
                gender: req.gender,
                age: req.age,
                education: req.education,
                income_bracket: req.income_bracket,
                phone_number: req.phone_number,
                profile_pic: req.profile_pic,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    async fn verify_off_thread(&self, password: &str, digest: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }

    async fn hash_off_thread(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();

        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        Ok(digest)
    }
}
