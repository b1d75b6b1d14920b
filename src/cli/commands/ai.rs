//! One-shot AI commands: plan, teach, translate and generate-course.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::content::Course;
use crate::flows::{CourseInput, MicroCourse, MicroCourseInput, PlanInput, TranslateInput};
use crate::platform::Platform;
use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};

fn ai_platform(settings: Settings) -> Result<Platform> {
    if let Err(e) = preflight::check(Operation::Ai) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }
    Ok(Platform::new(settings)?)
}

/// Run the plan command.
pub async fn run_plan(level: &str, goals: &str, settings: Settings) -> Result<()> {
    let platform = ai_platform(settings)?;

    let spinner = Output::spinner("Building your learning plan...");
    let result = platform
        .flows()
        .generate_initial_learning_plan(&PlanInput {
            user_skill_level: level.to_string(),
            user_learning_goals: goals.to_string(),
        })
        .await;
    spinner.finish_and_clear();

    let plan = result?;
    Output::header("Your Learning Plan");
    println!("\n{}\n", plan.learning_plan);
    Ok(())
}

/// Run the teach command.
pub async fn run_teach(topic: &str, settings: Settings) -> Result<()> {
    let platform = ai_platform(settings)?;

    let spinner = Output::spinner(&format!("Preparing a micro-course on {}...", topic));
    let result = platform
        .flows()
        .generate_micro_course(&MicroCourseInput {
            topic: topic.to_string(),
        })
        .await;
    spinner.finish_and_clear();

    print_micro_course(&result?);
    Ok(())
}

fn print_micro_course(course: &MicroCourse) {
    Output::header(&course.title);
    println!("\n{}\n", course.introduction);

    println!("{}", style("Key Concepts").bold());
    for concept in &course.key_concepts {
        Output::list_item(&format!("{}: {}", style(&concept.concept).bold(), concept.description));
    }
    println!();

    println!("{} {}", style("Challenge:").bold().cyan(), style(&course.challenge.title).bold());
    println!("{}\n", course.challenge.description);
}

/// Run the translate command.
pub async fn run_translate(language: &str, text: &str, settings: Settings) -> Result<()> {
    let platform = ai_platform(settings)?;

    let spinner = Output::spinner(&format!("Translating to {}...", language));
    let result = platform
        .flows()
        .translate_content(&TranslateInput {
            text: text.to_string(),
            language: language.to_string(),
        })
        .await;
    spinner.finish_and_clear();

    println!("{}", result?.translated_text);
    Ok(())
}

/// Run the generate-course command and write the course as JSON.
pub async fn run_generate_course(topic: &str, output: Option<String>, settings: Settings) -> Result<()> {
    let dir = output
        .map(|o| Settings::expand_path(&o))
        .or_else(|| settings.courses_dir())
        .unwrap_or_else(|| PathBuf::from("."));
    let platform = ai_platform(settings)?;

    let spinner = Output::spinner(&format!("Generating a course on {} (this can take a while)...", topic));
    let result = platform
        .flows()
        .generate_course(&CourseInput {
            topic: topic.to_string(),
        })
        .await;
    spinner.finish_and_clear();

    let course = result?;
    let path = write_course(&course, &dir)?;

    Output::success(&format!(
        "Generated '{}' with {} lessons",
        course.title,
        course.lessons.len()
    ));
    Output::kv("Saved to", &path.display().to_string());
    Ok(())
}

fn write_course(course: &Course, dir: &Path) -> crate::error::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(course.export_file_name());
    std::fs::write(&path, course.to_pretty_json()?)?;
    Ok(path)
}
