//! 问卷服务认证库
//! 密码哈希、访问令牌、会话解析与 HTTP 接口

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
