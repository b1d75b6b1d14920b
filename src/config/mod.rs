//! Configuration module for SkillSprint.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{FlowPrompt, Prompts};
pub use settings::{
    AiSettings, ContentSettings, GamificationSettings, GeneralSettings, PromptSettings,
    ServerSettings, Settings, StoreProvider, StoreSettings,
};
