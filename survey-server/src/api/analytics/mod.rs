//! Analytics API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/analytics | GET | 全局或单问卷统计 (surveyId, from, to) |
//! | /api/surveys/{id}/questions/statistics | GET | 逐题答案分布 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub use handler::{AnalyticsQuery, resolve_window};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/analytics", get(handler::survey_analytics))
        .route(
            "/api/surveys/{id}/questions/statistics",
            get(handler::question_statistics),
        )
}
