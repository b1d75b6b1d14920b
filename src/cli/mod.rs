//! CLI module for SkillSprint.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// SkillSprint - AI-assisted learning
///
/// Browse courses, take quizzes, talk to the AI tutor and author new content
/// from the terminal, or serve everything over HTTP.
#[derive(Parser, Debug)]
#[command(name = "skillsprint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SKILLSPRINT_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up directories and configuration
    Init,

    /// Browse the course catalog
    Courses {
        #[command(subcommand)]
        action: CoursesAction,
    },

    /// Check a course or lesson JSON file for problems
    Validate {
        /// Path to the JSON file
        file: String,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the SkillSprint assistant
    Chat,

    /// Ask the tutor about a course
    Tutor {
        /// Course id
        course: String,

        /// Preferred learning style (e.g. visual, hands-on)
        #[arg(long)]
        style: Option<String>,
    },

    /// Get a personalized learning plan
    Plan {
        /// Current skill level (e.g. beginner)
        #[arg(short, long)]
        level: String,

        /// What you want to learn
        goals: String,
    },

    /// Generate a bite-sized micro-course
    Teach {
        /// Topic to teach
        topic: String,
    },

    /// Generate a complete course and write it as JSON
    GenerateCourse {
        /// Course topic
        topic: String,

        /// Output directory (defaults to content.courses_dir or the current directory)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Author lessons with the course-creator agent
    Create,

    /// Translate text into another language
    Translate {
        /// Target language
        #[arg(short, long)]
        language: String,

        /// Text to translate
        text: String,
    },

    /// Show the XP leaderboard
    Leaderboard {
        /// Number of entries
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CoursesAction {
    /// List all courses
    List,

    /// Show a course and its lessons
    Show {
        /// Course id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
