//! Init command - interactive first-run setup.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Settings, StoreProvider};
use crate::platform::load_catalog;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("SkillSprint Setup");
    println!();
    println!("Welcome to SkillSprint! Let's make sure everything is configured correctly.\n");

    // Step 1: API key
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    if let Err(e) = preflight::check(Operation::Ai) {
        Output::warning(&e.to_string());
        println!();
        println!("  The tutor, hints, feedback and course generation need an OpenAI API key.");
        println!("  Get your API key from: {}", style("https://platform.openai.com/api-keys").underlined());
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'skillsprint init' again.");
            return Ok(());
        }
    } else {
        Output::success("OpenAI API key is configured!");
    }

    println!();

    // Step 2: Directories
    println!("{}", style("Step 2: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    if let Some(courses_dir) = settings.courses_dir() {
        if !courses_dir.exists() {
            std::fs::create_dir_all(&courses_dir)?;
            Output::success(&format!("Created courses directory: {}", courses_dir.display()));
        }
    }

    match settings.store.provider {
        StoreProvider::Sqlite => Output::kv("Profiles", &settings.sqlite_path().display().to_string()),
        StoreProvider::Memory => Output::warning("Profiles use the memory store and are lost on exit."),
    }

    let catalog = load_catalog(settings)?;
    Output::kv("Courses", &format!("{} available", catalog.len()));

    println!();

    // Step 3: Config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Browse the catalog", style("skillsprint courses list").cyan());
    println!("  {} Ask the course tutor", style("skillsprint tutor <course-id>").cyan());
    println!("  {} Start the API server", style("skillsprint serve").cyan());
    println!();
    println!("For more help: {}", style("skillsprint --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
