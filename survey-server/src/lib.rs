//! Survey Server - 问卷采集与统计分析服务
//!
//! # 模块结构
//!
//! ```text
//! survey-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务
//! ├── db/            # SQLite 存储 (sqlx) 与 repository
//! ├── validation/    # 答卷校验
//! ├── aggregation/   # 纯函数统计引擎
//! ├── analytics/     # 统计服务 (加载 + 聚合 + DTO)
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、时间、输入校验
//! ```

pub mod aggregation;
pub mod analytics;
pub mod api;
pub mod core;
pub mod db;
pub mod utils;
pub mod validation;

// Re-export 公共类型
pub use analytics::AnalyticsService;
pub use core::{Config, Server, ServerState, build_app};
pub use db::DbService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env 并初始化日志
pub fn setup_environment() -> Result<(), core::ServerError> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(core::ServerError::Config(format!("Failed to load .env: {e}")));
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty());
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____
  / ___/__  ________   _____  __  __
  \__ \/ / / / ___/ | / / _ \/ / / /
 ___/ / /_/ / /   | |/ /  __/ /_/ /
/____/\__,_/_/    |___/\___/\__, /
                           /____/
    "#
    );
}
