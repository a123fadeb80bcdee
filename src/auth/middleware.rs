//! Bearer 认证中间件

use crate::{auth::session::SessionResolver, error::AppError, models::user::Principal};
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// 当前用户（由中间件注入请求扩展）
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

// 实现 FromRequestParts 以便在 handler 中直接提取 CurrentUser
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// 认证中间件 - 必须携带有效的 Bearer 令牌
pub async fn session_auth_middleware(
    State(resolver): State<Arc<SessionResolver>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = resolver.resolve_headers(req.headers()).await?;

    // 附加到请求扩展
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
