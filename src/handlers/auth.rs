//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::AppState,
    models::{auth::*, user::*},
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Form, Json};
use std::sync::Arc;

/// 登录（OAuth2 password 表单）
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(req): Form<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state
        .auth_service
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(response))
}

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            msg: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

/// 获取当前用户信息
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    // 中间件与这里之间记录可能已被删除
    let user = state
        .store
        .find_by_id(principal.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(UserProfile::from(user)))
}
