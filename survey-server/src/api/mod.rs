//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`surveys`] - 问卷管理接口
//! - [`responses`] - 答卷提交与查询
//! - [`analytics`] - 统计分析接口
//! - [`suggestions`] - 建议 / 需求反馈

pub mod analytics;
pub mod health;
pub mod responses;
pub mod suggestions;
pub mod surveys;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(surveys::router())
        .merge(responses::router())
        .merge(analytics::router())
        .merge(suggestions::router())
}
