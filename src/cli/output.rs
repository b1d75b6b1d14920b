//! CLI output formatting utilities.

use crate::content::{CourseInfo, LessonOutline};
use crate::store::LeaderboardEntry;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a catalog entry.
    pub fn course_info(course: &CourseInfo) {
        println!(
            "  {} {} ({}, {} lessons, {})",
            style("*").cyan(),
            style(&course.title).bold(),
            style(&course.id).dim(),
            course.lesson_count,
            format_minutes(course.total_minutes)
        );
        println!("    {}", content_preview(&course.description, 100));
    }

    /// Print one lesson of a course outline.
    pub fn lesson_line(lesson: &LessonOutline) {
        println!(
            "  {} {} {}",
            style(format!("{:>3}.", lesson.id)).cyan(),
            lesson.title,
            style(format!("({})", format_minutes(lesson.duration))).dim()
        );
    }

    /// Print a leaderboard row.
    pub fn leaderboard_row(entry: &LeaderboardEntry) {
        let rank = match entry.rank {
            1 => style(format!("#{}", entry.rank)).yellow().bold(),
            2 | 3 => style(format!("#{}", entry.rank)).cyan().bold(),
            _ => style(format!("#{}", entry.rank)).dim(),
        };
        println!("  {:>4} {:<24} {} XP", rank, entry.name, entry.xp);
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format minutes as `1h 5m` or `45m`.
fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
