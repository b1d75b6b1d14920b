//! Interactive course-creation session with the creator agent.

use super::chat::{read_repl_line, ReplInput};
use crate::agent::CreatorSession;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::content::{validate_lesson, Lesson};
use crate::platform::Platform;
use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};

/// Run the create command.
pub async fn run_create(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ai) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let platform = Platform::new(settings)?;
    let mut session = CreatorSession::new();

    println!("\n{}", style("SkillSprint Course Creator").bold().cyan());
    println!(
        "{}\n",
        style("Describe the lesson you want. 'save [file]' writes the latest lesson, 'clear' starts over, 'exit' quits.")
            .dim()
    );

    loop {
        let line = match read_repl_line("You:")? {
            ReplInput::Empty => continue,
            ReplInput::Exit => {
                Output::info("Goodbye!");
                break;
            }
            ReplInput::Clear => {
                session.clear();
                Output::info("Session cleared.");
                continue;
            }
            ReplInput::Line(line) => line,
        };

        if let Some(target) = save_target(&line) {
            match session.latest_lesson() {
                Some(lesson) => match save_lesson(lesson, target.as_deref()) {
                    Ok(path) => Output::success(&format!("Saved lesson to {}", path.display())),
                    Err(e) => Output::error(&format!("Could not save lesson: {}", e)),
                },
                None => Output::warning("No lesson generated yet."),
            }
            continue;
        }

        let spinner = Output::spinner("Agent working...");
        let result = session.send(platform.creator_agent(), &line).await;
        spinner.finish_and_clear();

        match result {
            Ok(output) => {
                println!("\n{} {}\n", style("AI:").cyan().bold(), output.response);
                for call in &output.tool_calls {
                    println!("  {}", style(format!("[{}]", call.name)).dim());
                }
                if let Some(lesson) = &output.generated_lesson {
                    print_lesson(lesson);
                }
            }
            Err(e) => Output::error(&format!("Agent failed: {}", e)),
        }
    }

    Ok(())
}

/// `save` or `save <file>`; anything else is an instruction for the agent.
fn save_target(line: &str) -> Option<Option<String>> {
    let mut parts = line.splitn(2, char::is_whitespace);
    if !parts.next()?.eq_ignore_ascii_case("save") {
        return None;
    }
    Some(parts.next().map(str::trim).filter(|s| !s.is_empty()).map(String::from))
}

fn save_lesson(lesson: &Lesson, target: Option<&str>) -> crate::error::Result<PathBuf> {
    let path = match target {
        Some(t) => Settings::expand_path(t),
        None => Path::new(".").join(lesson.export_file_name()),
    };
    std::fs::write(&path, lesson.to_pretty_json()?)?;
    Ok(path)
}

fn print_lesson(lesson: &Lesson) {
    Output::header(&format!("Lesson {}: {}", lesson.id, lesson.title));
    Output::kv("Duration", &format!("{} min", lesson.duration));
    Output::kv("Practice", &format!("{} questions", lesson.practice.questions.len()));
    Output::kv("Project", &lesson.project.title);
    Output::kv("Assessment", &format!("{} questions", lesson.assessment.questions.len()));

    let issues = validate_lesson(lesson);
    if !issues.is_empty() {
        Output::warning(&format!("{} content issue(s):", issues.len()));
        for issue in &issues {
            Output::list_item(&issue.to_string());
        }
    }
    println!();
}
