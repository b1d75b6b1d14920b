//! SkillSprint CLI entry point.

use anyhow::Result;
use clap::Parser;
use skillsprint::cli::{commands, Cli, Commands};
use skillsprint::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("skillsprint={}", log_level(cli.verbose, &settings))),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Courses { action } => {
            commands::run_courses(action, &settings)?;
        }

        Commands::Validate { file } => {
            commands::run_validate(file)?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Chat => {
            commands::run_chat(settings).await?;
        }

        Commands::Tutor { course, style } => {
            commands::run_tutor(course, style.clone(), settings).await?;
        }

        Commands::Plan { level, goals } => {
            commands::run_plan(level, goals, settings).await?;
        }

        Commands::Teach { topic } => {
            commands::run_teach(topic, settings).await?;
        }

        Commands::GenerateCourse { topic, output } => {
            commands::run_generate_course(topic, output.clone(), settings).await?;
        }

        Commands::Create => {
            commands::run_create(settings).await?;
        }

        Commands::Translate { language, text } => {
            commands::run_translate(language, text, settings).await?;
        }

        Commands::Leaderboard { limit } => {
            commands::run_leaderboard(*limit, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}

/// `-v` flags win over the configured `general.log_level`.
fn log_level(verbose: u8, settings: &Settings) -> &str {
    match verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
