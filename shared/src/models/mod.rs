//! Data models
//!
//! Shared between survey-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (snowflake, see [`crate::util::snowflake_id`]).

pub mod analytics;
pub mod question;
pub mod suggestion;
pub mod survey;
pub mod survey_response;

// Re-exports
pub use analytics::*;
pub use question::*;
pub use suggestion::*;
pub use survey::*;
pub use survey_response::*;
