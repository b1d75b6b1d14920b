//! Platform services for SkillSprint.
//!
//! Ties the catalog, the profile store, the AI flows and the creator agent
//! together. The HTTP API and the CLI both go through this type.

use crate::agent::{CourseCreatorAgent, CreatorAgentOutput, CreatorTurn, ToolContext};
use crate::config::{Prompts, Settings};
use crate::content::{Course, CourseCatalog, CourseInfo, Lesson, QuizKind};
use crate::error::{Result, SprintError};
use crate::flows::{
    ChatTurn, CourseContext, CourseInput, EvaluateInput, Evaluation, FlowRunner, TutorInput,
    TutorOutput, UserPreferences,
};
use crate::llm::{ChatModel, OpenAiChatModel};
use crate::profile::{Award, DashboardView, Gamification, UserProfile, XpEvent};
use crate::quiz::{check_answer, grade_assessment, AssessmentReport, CheckOutcome};
use crate::store::{open_store, LeaderboardEntry, ProfileStore};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Shown when the dashboard suggestion flow fails.
pub const SUGGESTION_FALLBACK: &str = "I couldn't generate a tip right now. Maybe try again?";

/// A practice check, plus the XP it earned when a learner was named.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeCheck {
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub award: Option<Award>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSubmission {
    #[serde(flatten)]
    pub report: AssessmentReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub award: Option<Award>,
}

/// A learner's project hand-in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSubmission {
    #[serde(default)]
    pub submission_text: Option<String>,
    #[serde(default)]
    pub submission_file: Option<String>,
    #[serde(default)]
    pub student_level: Option<String>,
    #[serde(default)]
    pub feedback_request: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEvaluation {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub award: Option<Award>,
}

/// The bundled courses, layered with `content.courses_dir` when configured.
pub fn load_catalog(settings: &Settings) -> Result<CourseCatalog> {
    match settings.courses_dir() {
        Some(dir) => CourseCatalog::load_dir(&dir),
        None => CourseCatalog::bundled(),
    }
}

/// The platform's services.
pub struct Platform {
    settings: Settings,
    catalog: RwLock<CourseCatalog>,
    store: Arc<dyn ProfileStore>,
    flows: Arc<FlowRunner>,
    agent: CourseCreatorAgent,
    gamification: Gamification,
}

impl Platform {
    /// Build the platform from settings: OpenAI model, configured store and catalog.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let catalog = load_catalog(&settings)?;

        let model: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(
            &settings.ai.model,
            Duration::from_secs(settings.ai.timeout_secs),
        )?);

        let store = open_store(&settings)?;

        info!(
            "Platform ready: {} courses, {} store, model {}",
            catalog.len(),
            settings.store.provider,
            settings.ai.model
        );

        Ok(Self::with_components(settings, catalog, store, model, prompts))
    }

    /// Create a platform with custom components.
    pub fn with_components(
        settings: Settings,
        catalog: CourseCatalog,
        store: Arc<dyn ProfileStore>,
        model: Arc<dyn ChatModel>,
        prompts: Prompts,
    ) -> Self {
        let flows = Arc::new(
            FlowRunner::new(Arc::clone(&model), prompts).with_temperature(settings.ai.temperature),
        );
        let agent = CourseCreatorAgent::new(
            model,
            ToolContext::new(Arc::clone(&flows)),
            &flows.prompts().creator.system,
        )
        .with_model(&settings.ai.agent_model)
        .with_max_iterations(settings.ai.max_agent_iterations);
        let gamification = Gamification::new(&settings.gamification);

        Self {
            settings,
            catalog: RwLock::new(catalog),
            store,
            flows,
            agent,
            gamification,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The AI flows, for features that need no platform state.
    pub fn flows(&self) -> &FlowRunner {
        &self.flows
    }

    pub fn store(&self) -> Arc<dyn ProfileStore> {
        Arc::clone(&self.store)
    }

    fn catalog(&self) -> Result<RwLockReadGuard<'_, CourseCatalog>> {
        self.catalog
            .read()
            .map_err(|e| SprintError::Content(format!("Failed to acquire catalog lock: {}", e)))
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // Content

    pub fn courses(&self) -> Result<Vec<CourseInfo>> {
        Ok(self.catalog()?.list())
    }

    pub fn course(&self, id: &str) -> Result<Course> {
        Ok(self.catalog()?.require(id)?.clone())
    }

    pub fn lesson(&self, course_id: &str, lesson_id: &str) -> Result<Lesson> {
        Ok(self.catalog()?.require_lesson(course_id, lesson_id)?.clone())
    }

    /// Add or replace a course in the catalog.
    pub fn publish_course(&self, course: Course) -> Result<()> {
        let mut catalog = self
            .catalog
            .write()
            .map_err(|e| SprintError::Content(format!("Failed to acquire catalog lock: {}", e)))?;
        info!("Publishing course {}", course.id);
        catalog.insert(course);
        Ok(())
    }

    // Learning

    /// Check one practice answer. A correct answer earns XP when `uid` is given.
    #[instrument(skip(self, answer))]
    pub async fn check_practice(
        &self,
        course_id: &str,
        lesson_id: &str,
        index: usize,
        answer: &str,
        uid: Option<&str>,
    ) -> Result<PracticeCheck> {
        let question = {
            let catalog = self.catalog()?;
            let lesson = catalog.require_lesson(course_id, lesson_id)?;
            lesson
                .quiz(QuizKind::Practice)
                .questions
                .get(index)
                .cloned()
                .ok_or_else(|| {
                    SprintError::InvalidInput(format!("question index {} out of range", index))
                })?
        };
        if !question.has_option(answer) {
            return Err(SprintError::InvalidInput(format!(
                "'{}' is not an option for this question",
                answer
            )));
        }

        let outcome = check_answer(index, &question, answer, self.flows.as_ref()).await;
        let award = match uid {
            Some(uid) if outcome.is_correct => Some(self.award(uid, XpEvent::PracticeCorrect).await?),
            _ => None,
        };
        Ok(PracticeCheck { outcome, award })
    }

    /// Grade an assessment. Passing earns XP when `uid` is given.
    #[instrument(skip(self, answers))]
    pub async fn submit_assessment(
        &self,
        course_id: &str,
        lesson_id: &str,
        answers: &[Option<String>],
        uid: Option<&str>,
    ) -> Result<AssessmentSubmission> {
        let report = {
            let catalog = self.catalog()?;
            let lesson = catalog.require_lesson(course_id, lesson_id)?;
            grade_assessment(
                lesson.quiz(QuizKind::Assessment),
                answers,
                self.settings.gamification.pass_mark,
            )?
        };

        let award = match uid {
            Some(uid) if report.passed => Some(self.award(uid, XpEvent::AssessmentPassed).await?),
            _ => None,
        };
        Ok(AssessmentSubmission { report, award })
    }

    /// Evaluate a lesson project against its task description.
    #[instrument(skip(self, submission))]
    pub async fn evaluate_project(
        &self,
        course_id: &str,
        lesson_id: &str,
        submission: ProjectSubmission,
        uid: Option<&str>,
    ) -> Result<ProjectEvaluation> {
        let task_description = self.lesson(course_id, lesson_id)?.project.description;

        let mut input = EvaluateInput {
            task_description,
            submission_text: submission.submission_text,
            submission_file: submission.submission_file,
            student_level: "beginner".to_string(),
            feedback_request: submission.feedback_request,
        };
        if let Some(level) = submission.student_level.filter(|l| !l.trim().is_empty()) {
            input.student_level = level;
        }

        let evaluation = self.flows.evaluate_submitted_task(&input).await?;
        let award = match uid {
            Some(uid) => Some(
                self.award(
                    uid,
                    XpEvent::ProjectEvaluated {
                        score: evaluation.score,
                    },
                )
                .await?,
            ),
            None => None,
        };
        Ok(ProjectEvaluation { evaluation, award })
    }

    /// Ask the course tutor a question.
    pub async fn tutor(
        &self,
        course_id: &str,
        question: &str,
        file_data_uri: Option<String>,
        history: Vec<ChatTurn>,
        user_preferences: Option<UserPreferences>,
    ) -> Result<TutorOutput> {
        let course_context = CourseContext::from(&self.course(course_id)?);
        self.flows
            .course_tutor(&TutorInput {
                question: question.to_string(),
                file_data_uri,
                course_context,
                history,
                user_preferences,
            })
            .await
    }

    // Profiles

    pub async fn register(&self, uid: &str, name: &str, email: &str) -> Result<UserProfile> {
        if uid.trim().is_empty() {
            return Err(SprintError::InvalidInput("uid must not be empty".to_string()));
        }
        if name.trim().is_empty() {
            return Err(SprintError::InvalidInput("name must not be empty".to_string()));
        }
        let profile = UserProfile::new(uid, name.trim(), email.trim());
        self.store.create(&profile).await?;
        info!("Registered profile {}", uid);
        Ok(profile)
    }

    /// A profile with its streak and weekly progress brought up to date.
    pub async fn profile(&self, uid: &str) -> Result<UserProfile> {
        let mut profile = self.store.get(uid).await?;
        self.gamification.refresh(&mut profile, Self::today());
        Ok(profile)
    }

    pub async fn dashboard(&self, uid: &str) -> Result<DashboardView> {
        let profile = self.profile(uid).await?;
        let catalog = self.catalog()?;
        Ok(DashboardView::build(profile, &catalog))
    }

    /// A coaching tip for the dashboard. Flow failures yield a fixed fallback.
    pub async fn suggestion(&self, uid: &str) -> Result<String> {
        let input = self.dashboard(uid).await?.suggestion_input();
        match self.flows.generate_dashboard_suggestion(&input).await {
            Ok(output) => Ok(output.suggestion),
            Err(e) => {
                warn!("Dashboard suggestion failed for {}: {}", uid, e);
                Ok(SUGGESTION_FALLBACK.to_string())
            }
        }
    }

    /// Set the learner's "continue learning" lesson.
    pub async fn set_active(&self, uid: &str, course_id: &str, lesson_id: &str) -> Result<UserProfile> {
        self.lesson(course_id, lesson_id)?;
        self.store
            .update(uid, &mut |profile| profile.set_active(course_id, lesson_id))
            .await
    }

    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        self.store.leaderboard(limit).await
    }

    async fn award(&self, uid: &str, event: XpEvent) -> Result<Award> {
        let today = Self::today();
        let mut award = None;
        self.store
            .update(uid, &mut |profile| {
                award = Some(self.gamification.award(profile, event, today));
            })
            .await?;
        award.ok_or_else(|| SprintError::Store(format!("No award recorded for {}", uid)))
    }

    // Authoring

    /// Generate a course; `publish` adds it to the catalog.
    pub async fn generate_course(&self, topic: &str, publish: bool, uid: Option<&str>) -> Result<Course> {
        let course = self
            .flows
            .generate_course(&CourseInput {
                topic: topic.to_string(),
            })
            .await?;
        if publish {
            self.publish_course(course.clone())?;
            if let Some(uid) = uid {
                self.award(uid, XpEvent::ContentCreated).await?;
            }
        }
        Ok(course)
    }

    pub fn creator_agent(&self) -> &CourseCreatorAgent {
        &self.agent
    }

    /// Run the course-creator agent. A generated lesson earns the creator badge.
    pub async fn run_creator_agent(
        &self,
        instruction: &str,
        history: &[CreatorTurn],
        uid: Option<&str>,
    ) -> Result<CreatorAgentOutput> {
        let output = self.agent.run(instruction, history).await?;
        if let (Some(uid), Some(_)) = (uid, &output.generated_lesson) {
            self.award(uid, XpEvent::ContentCreated).await?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::lesson_json;
    use crate::llm::scripted::ScriptedModel;
    use crate::store::{MemoryProfileStore, SqliteProfileStore};

    fn platform(model: Arc<ScriptedModel>) -> Platform {
        Platform::with_components(
            Settings::default(),
            CourseCatalog::bundled().unwrap(),
            Arc::new(MemoryProfileStore::new()),
            model,
            Prompts::default(),
        )
    }

    #[tokio::test]
    async fn test_courses_and_lessons() {
        let p = platform(Arc::new(ScriptedModel::new()));
        assert_eq!(p.courses().unwrap().len(), 3);
        assert_eq!(p.lesson("react-fundamentals", "2").unwrap().title, "Components and Props");
        assert!(matches!(p.course("nope"), Err(SprintError::NotFound(_))));
        assert!(matches!(
            p.lesson("react-fundamentals", "99"),
            Err(SprintError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_correct_practice_awards_xp() {
        let model = Arc::new(ScriptedModel::new());
        let p = platform(model.clone());
        p.register("u1", "Ada", "ada@example.com").await.unwrap();

        let check = p
            .check_practice("react-fundamentals", "1", 0, "Building user interfaces", Some("u1"))
            .await
            .unwrap();
        assert!(check.outcome.is_correct);
        assert_eq!(check.award.unwrap().xp_gained, 10);
        assert_eq!(model.calls(), 0);
        assert_eq!(p.profile("u1").await.unwrap().xp, 10);
    }

    #[tokio::test]
    async fn test_wrong_practice_fetches_hint() {
        let model = Arc::new(ScriptedModel::new().reply(r#"{"hint": "Think about what users see."}"#));
        let p = platform(model.clone());

        let check = p
            .check_practice("react-fundamentals", "1", 0, "Managing databases", None)
            .await
            .unwrap();
        assert!(!check.outcome.is_correct);
        assert_eq!(check.outcome.hint.as_deref(), Some("Think about what users see."));
        assert!(check.award.is_none());

        let err = p
            .check_practice("react-fundamentals", "1", 0, "Not an option", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SprintError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_assessment_pass_awards_xp() {
        let p = platform(Arc::new(ScriptedModel::new()));
        p.register("u1", "Ada", "ada@example.com").await.unwrap();

        let answers = vec![
            Some("The virtual DOM".to_string()),
            Some("Components".to_string()),
            Some("Plain JavaScript".to_string()),
        ];
        let result = p
            .submit_assessment("react-fundamentals", "1", &answers, Some("u1"))
            .await
            .unwrap();
        assert_eq!(result.report.percentage, 100);
        assert!(result.report.passed);
        assert_eq!(result.award.unwrap().xp_gained, 50);

        let failing = vec![Some("The server".to_string())];
        let result = p
            .submit_assessment("react-fundamentals", "1", &failing, Some("u1"))
            .await
            .unwrap();
        assert!(!result.report.passed);
        assert!(result.award.is_none());
    }

    #[tokio::test]
    async fn test_project_uses_lesson_task_and_default_level() {
        let model = Arc::new(ScriptedModel::new().reply_json(serde_json::json!({
            "score": 80,
            "feedback": "Solid.",
            "summaryOfMistakes": "None major.",
            "suggestions": "Add tests.",
            "improvementPaths": "Learn hooks."
        })));
        let p = platform(model.clone());
        p.register("u1", "Ada", "ada@example.com").await.unwrap();

        let result = p
            .evaluate_project(
                "react-fundamentals",
                "1",
                ProjectSubmission {
                    submission_text: Some("function App() {}".to_string()),
                    ..Default::default()
                },
                Some("u1"),
            )
            .await
            .unwrap();
        assert_eq!(result.evaluation.score, 80);
        assert_eq!(result.award.unwrap().xp_gained, 40);

        let requests = model.requests();
        match &requests[0].messages[1] {
            crate::llm::ChatMessage::User { text, .. } => {
                assert!(text.contains("render a greeting component"));
                assert!(text.contains("Student Level: beginner"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_suggestion_falls_back() {
        let model = Arc::new(ScriptedModel::new().fail("quota"));
        let p = platform(model);
        p.register("u1", "Ada", "ada@example.com").await.unwrap();
        assert_eq!(p.suggestion("u1").await.unwrap(), SUGGESTION_FALLBACK);
    }

    #[tokio::test]
    async fn test_dashboard_and_active_lesson() {
        let p = platform(Arc::new(ScriptedModel::new()));
        p.register("u1", "Ada", "ada@example.com").await.unwrap();
        assert!(p.set_active("u1", "advanced-css", "9").await.is_err());

        p.set_active("u1", "advanced-css", "1").await.unwrap();
        let view = p.dashboard("u1").await.unwrap();
        assert_eq!(view.active_course.unwrap().id, "advanced-css");
        assert_eq!(view.next_lesson.unwrap().title, "CSS Grid");
    }

    #[tokio::test]
    async fn test_register_duplicate_and_leaderboard() {
        let p = platform(Arc::new(ScriptedModel::new()));
        p.register("u1", "Ada", "ada@example.com").await.unwrap();
        p.register("u2", "Bob", "bob@example.com").await.unwrap();
        assert!(matches!(
            p.register("u1", "Ada", "ada@example.com").await,
            Err(SprintError::InvalidInput(_))
        ));

        p.check_practice("advanced-css", "1", 0, "display: flex", Some("u2"))
            .await
            .unwrap();
        let board = p.leaderboard(10).await.unwrap();
        assert_eq!(board[0].uid, "u2");
        assert_eq!(board[0].rank, 1);
    }

    #[tokio::test]
    async fn test_agent_lesson_awards_creator_badge() {
        let model = Arc::new(
            ScriptedModel::new()
                .tool_call("c1", "generateLessonContent", serde_json::json!({"lessonTopic": "Grid"}))
                .reply_json(lesson_json("1", 5))
                .reply("Your lesson is in the editor."),
        );
        let p = platform(model);
        p.register("admin", "Admin", "admin@example.com").await.unwrap();

        let out = p.run_creator_agent("Make a Grid lesson", &[], Some("admin")).await.unwrap();
        assert!(out.generated_lesson.is_some());
        assert!(p.profile("admin").await.unwrap().has_badge("Creator"));
    }

    async fn concurrent_practice_awards(store: Arc<dyn ProfileStore>) {
        let p = Arc::new(Platform::with_components(
            Settings::default(),
            CourseCatalog::bundled().unwrap(),
            store,
            Arc::new(ScriptedModel::new()),
            Prompts::default(),
        ));
        p.register("u1", "Ada", "ada@example.com").await.unwrap();

        let tasks: Vec<_> = (0..200)
            .map(|_| {
                let p = Arc::clone(&p);
                tokio::spawn(async move {
                    p.check_practice("react-fundamentals", "1", 0, "Building user interfaces", Some("u1"))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().outcome.is_correct);
        }

        let profile = p.profile("u1").await.unwrap();
        assert_eq!(profile.xp, 2000);
        assert!(profile.has_badge("First Steps"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_awards_are_all_kept_in_memory_store() {
        concurrent_practice_awards(Arc::new(MemoryProfileStore::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_awards_are_all_kept_in_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteProfileStore::new(&dir.path().join("profiles.db")).unwrap();
        concurrent_practice_awards(Arc::new(store)).await;
    }
}
