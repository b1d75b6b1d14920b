//! SkillSprint - AI-assisted learning
//!
//! Courses, quizzes, gamified learner profiles and a set of LLM-backed
//! learning features, served over HTTP or used from the command line.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `content` - Course model, catalog, editor helpers and validation
//! - `quiz` - Practice checks with AI hints, assessment grading
//! - `llm` - Chat model abstraction and the OpenAI implementation
//! - `flows` - Structured AI features (tutor, feedback, course generation, ...)
//! - `agent` - The course-creator agent and its lesson tool
//! - `profile` - Learner profiles, XP, streaks, badges and the dashboard
//! - `store` - Profile and leaderboard persistence
//! - `platform` - Everything above behind one facade
//!
//! # Example
//!
//! ```rust,no_run
//! use skillsprint::config::Settings;
//! use skillsprint::platform::Platform;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let platform = Platform::new(Settings::load()?)?;
//!
//!     let check = platform
//!         .check_practice("react-fundamentals", "1", 0, "Managing databases", None)
//!         .await?;
//!     println!("{}: {}", check.outcome.title, check.outcome.hint.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod flows;
pub mod llm;
pub mod openai;
pub mod platform;
pub mod profile;
pub mod quiz;
pub mod store;

pub use error::{Result, SprintError};
