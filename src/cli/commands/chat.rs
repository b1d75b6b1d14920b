//! Interactive chat and tutor sessions.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::flows::{ChatInput, ChatTurn, UserPreferences};
use crate::platform::Platform;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Turns of history sent with each question.
const MAX_HISTORY_TURNS: usize = 15;

/// What the user typed at the prompt.
#[derive(Debug, PartialEq)]
pub(crate) enum ReplInput {
    Line(String),
    Clear,
    Exit,
    Empty,
}

pub(crate) fn parse_repl_line(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        ReplInput::Empty
    } else if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        ReplInput::Exit
    } else if line.eq_ignore_ascii_case("clear") {
        ReplInput::Clear
    } else {
        ReplInput::Line(line.to_string())
    }
}

/// Prompt and read one line. End of input reads as `exit`.
pub(crate) fn read_repl_line(prompt: &str) -> io::Result<ReplInput> {
    print!("{} ", style(prompt).green().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(ReplInput::Exit);
    }
    Ok(parse_repl_line(&input))
}

fn push_turn(history: &mut Vec<ChatTurn>, user: &str, model: &str) {
    history.push(ChatTurn {
        user: user.to_string(),
        model: model.to_string(),
    });
    if history.len() > MAX_HISTORY_TURNS {
        let excess = history.len() - MAX_HISTORY_TURNS;
        history.drain(..excess);
    }
}

/// Run the general assistant chat.
pub async fn run_chat(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ai) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let platform = Platform::new(settings)?;
    let mut history: Vec<ChatTurn> = Vec::new();

    println!("\n{}", style("SkillSprint Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask anything about your learning, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    loop {
        let question = match read_repl_line("You:")? {
            ReplInput::Empty => continue,
            ReplInput::Exit => {
                Output::info("Goodbye!");
                break;
            }
            ReplInput::Clear => {
                history.clear();
                Output::info("Conversation history cleared.");
                continue;
            }
            ReplInput::Line(line) => line,
        };

        let spinner = Output::spinner("Thinking...");
        let result = platform
            .flows()
            .chat(&ChatInput {
                question: question.clone(),
                history: history.clone(),
            })
            .await;
        spinner.finish_and_clear();

        match result {
            Ok(output) => {
                println!("\n{} {}\n", style("AI:").cyan().bold(), output.answer);
                push_turn(&mut history, &question, &output.answer);
            }
            Err(e) => Output::error(&format!("Error: {}", e)),
        }
    }

    Ok(())
}

/// Run a tutor session scoped to one course.
pub async fn run_tutor(course_id: &str, learning_style: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ai) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let platform = Platform::new(settings)?;
    let course = platform.course(course_id)?;
    let preferences = learning_style.map(|s| UserPreferences {
        learning_style: Some(s),
    });
    let mut history: Vec<ChatTurn> = Vec::new();

    println!("\n{} {}", style("AI Tutor:").bold().cyan(), style(&course.title).bold());
    println!(
        "{}\n",
        style("Ask about this course, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    loop {
        let question = match read_repl_line("You:")? {
            ReplInput::Empty => continue,
            ReplInput::Exit => {
                Output::info("Happy learning!");
                break;
            }
            ReplInput::Clear => {
                history.clear();
                Output::info("Conversation history cleared.");
                continue;
            }
            ReplInput::Line(line) => line,
        };

        let spinner = Output::spinner("Thinking...");
        let result = platform
            .tutor(course_id, &question, None, history.clone(), preferences.clone())
            .await;
        spinner.finish_and_clear();

        match result {
            Ok(output) => {
                println!("\n{} {}\n", style("Tutor:").cyan().bold(), output.answer);
                push_turn(&mut history, &question, &output.answer);
            }
            Err(e) => Output::error(&format!("Error: {}", e)),
        }
    }

    Ok(())
}
