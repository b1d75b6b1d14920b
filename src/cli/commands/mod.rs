//! CLI command implementations.

mod ai;
mod chat;
mod config;
mod courses;
mod create;
mod init;
mod leaderboard;
mod serve;

pub use ai::{run_generate_course, run_plan, run_teach, run_translate};
pub use chat::{run_chat, run_tutor};
pub use config::run_config;
pub use courses::{run_courses, run_validate};
pub use create::run_create;
pub use init::run_init;
pub use leaderboard::run_leaderboard;
pub use serve::{router, run_serve, ApiError};
