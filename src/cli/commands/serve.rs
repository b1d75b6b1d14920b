//! HTTP API server.
//!
//! Exposes the catalog, quizzes, profiles and AI features as JSON endpoints.

use crate::agent::{CreatorAgentOutput, CreatorTurn};
use crate::cli::Output;
use crate::config::Settings;
use crate::content::{validate_course, validate_lesson, Course, CourseInfo, Issue, Lesson};
use crate::error::SprintError;
use crate::flows::{
    ChatInput, ChatOutput, ChatTurn, FeedbackInput, FeedbackOutput, HintInput,
    HintOutput, MicroCourse, MicroCourseInput, PlanInput, PlanOutput, TranslateInput,
    TranslateOutput, TutorOutput, UserPreferences,
};
use crate::platform::{
    AssessmentSubmission, Platform, PracticeCheck, ProjectEvaluation, ProjectSubmission,
};
use crate::profile::{DashboardView, UserProfile};
use crate::store::{LeaderboardEntry, DEFAULT_LEADERBOARD_LIMIT};
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

type AppState = Arc<Platform>;
type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let platform = Arc::new(Platform::new(settings)?);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("SkillSprint API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Catalog", "GET  /courses, /courses/{id}, /courses/{id}/lessons/{lesson}");
    Output::kv("Quizzes", "POST /courses/{id}/lessons/{lesson}/practice/check | assessment | project");
    Output::kv("Tutor", "POST /courses/{id}/tutor");
    Output::kv("AI", "POST /ai/chat | feedback | hint | translate | learning-plan | micro-course | generate-course");
    Output::kv("Authoring", "POST /admin/agent, /admin/validate");
    Output::kv("Profiles", "POST /users, GET /users/{uid}[/dashboard|/suggestion], PUT /users/{uid}/active");
    Output::kv("Leaderboard", "GET  /leaderboard?limit=");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(platform)).await?;

    Ok(())
}

/// Build the API router over a platform.
pub fn router(platform: Arc<Platform>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses))
        .route("/courses/{id}", get(get_course))
        .route("/courses/{id}/lessons/{lesson}", get(get_lesson))
        .route("/courses/{id}/lessons/{lesson}/practice/check", post(check_practice))
        .route("/courses/{id}/lessons/{lesson}/assessment", post(submit_assessment))
        .route("/courses/{id}/lessons/{lesson}/project", post(evaluate_project))
        .route("/courses/{id}/tutor", post(tutor))
        .route("/ai/chat", post(chat))
        .route("/ai/feedback", post(feedback))
        .route("/ai/hint", post(hint))
        .route("/ai/translate", post(translate))
        .route("/ai/learning-plan", post(learning_plan))
        .route("/ai/micro-course", post(micro_course))
        .route("/ai/generate-course", post(generate_course))
        .route("/admin/agent", post(creator_agent))
        .route("/admin/validate", post(validate_content))
        .route("/users", post(register))
        .route("/users/{uid}", get(get_profile))
        .route("/users/{uid}/dashboard", get(dashboard))
        .route("/users/{uid}/suggestion", get(suggestion))
        .route("/users/{uid}/active", put(set_active))
        .route("/leaderboard", get(leaderboard))
        .layer(cors)
        .with_state(platform)
}

// === Errors ===

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// A platform error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError(SprintError);

impl From<SprintError> for ApiError {
    fn from(e: SprintError) -> Self {
        ApiError(e)
    }
}

fn status_for(e: &SprintError) -> StatusCode {
    match e {
        SprintError::NotFound(_) => StatusCode::NOT_FOUND,
        SprintError::InvalidInput(_) | SprintError::Validation(_) => StatusCode::BAD_REQUEST,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(SprintError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected: {}", self.0);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// === Request/Response Types ===

/// A JSON body whose rejections answer with the `{error}` body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
struct ApiJson<T>(T);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PracticeCheckRequest {
    question_index: usize,
    answer: String,
    #[serde(default)]
    uid: Option<String>,
}

#[derive(Deserialize)]
struct AssessmentRequest {
    answers: Vec<Option<String>>,
    #[serde(default)]
    uid: Option<String>,
}

#[derive(Deserialize)]
struct ProjectRequest {
    #[serde(flatten)]
    submission: ProjectSubmission,
    #[serde(default)]
    uid: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TutorRequest {
    question: String,
    #[serde(default)]
    file_data_uri: Option<String>,
    #[serde(default)]
    history: Vec<ChatTurn>,
    #[serde(default)]
    user_preferences: Option<UserPreferences>,
}

#[derive(Deserialize)]
struct GenerateCourseRequest {
    topic: String,
    /// Add the course to the catalog.
    #[serde(default)]
    publish: bool,
    #[serde(default)]
    uid: Option<String>,
}

#[derive(Deserialize)]
struct AgentRequest {
    instruction: String,
    #[serde(default)]
    history: Vec<CreatorTurn>,
    #[serde(default)]
    uid: Option<String>,
}

#[derive(Serialize)]
struct ValidateResponse {
    valid: bool,
    issues: Vec<Issue>,
}

#[derive(Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    uid: Option<String>,
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveRequest {
    course_id: String,
    lesson_id: String,
}

#[derive(Serialize)]
struct SuggestionResponse {
    suggestion: String,
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<usize>,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_courses(State(platform): State<AppState>) -> ApiResult<Vec<CourseInfo>> {
    Ok(Json(platform.courses()?))
}

async fn get_course(State(platform): State<AppState>, Path(id): Path<String>) -> ApiResult<Course> {
    Ok(Json(platform.course(&id)?))
}

async fn get_lesson(
    State(platform): State<AppState>,
    Path((id, lesson)): Path<(String, String)>,
) -> ApiResult<Lesson> {
    Ok(Json(platform.lesson(&id, &lesson)?))
}

async fn check_practice(
    State(platform): State<AppState>,
    Path((id, lesson)): Path<(String, String)>,
    ApiJson(req): ApiJson<PracticeCheckRequest>,
) -> ApiResult<PracticeCheck> {
    let check = platform
        .check_practice(&id, &lesson, req.question_index, &req.answer, req.uid.as_deref())
        .await?;
    Ok(Json(check))
}

async fn submit_assessment(
    State(platform): State<AppState>,
    Path((id, lesson)): Path<(String, String)>,
    ApiJson(req): ApiJson<AssessmentRequest>,
) -> ApiResult<AssessmentSubmission> {
    let submission = platform
        .submit_assessment(&id, &lesson, &req.answers, req.uid.as_deref())
        .await?;
    Ok(Json(submission))
}

async fn evaluate_project(
    State(platform): State<AppState>,
    Path((id, lesson)): Path<(String, String)>,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> ApiResult<ProjectEvaluation> {
    let evaluation = platform
        .evaluate_project(&id, &lesson, req.submission, req.uid.as_deref())
        .await?;
    Ok(Json(evaluation))
}

async fn tutor(
    State(platform): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TutorRequest>,
) -> ApiResult<TutorOutput> {
    let output = platform
        .tutor(&id, &req.question, req.file_data_uri, req.history, req.user_preferences)
        .await?;
    Ok(Json(output))
}

async fn chat(State(platform): State<AppState>, ApiJson(input): ApiJson<ChatInput>) -> ApiResult<ChatOutput> {
    Ok(Json(platform.flows().chat(&input).await?))
}

async fn feedback(
    State(platform): State<AppState>,
    ApiJson(input): ApiJson<FeedbackInput>,
) -> ApiResult<FeedbackOutput> {
    Ok(Json(platform.flows().provide_smart_feedback(&input).await?))
}

async fn hint(State(platform): State<AppState>, ApiJson(input): ApiJson<HintInput>) -> ApiResult<HintOutput> {
    Ok(Json(platform.flows().provide_practice_hint(&input).await?))
}

async fn translate(
    State(platform): State<AppState>,
    ApiJson(input): ApiJson<TranslateInput>,
) -> ApiResult<TranslateOutput> {
    Ok(Json(platform.flows().translate_content(&input).await?))
}

async fn learning_plan(
    State(platform): State<AppState>,
    ApiJson(input): ApiJson<PlanInput>,
) -> ApiResult<PlanOutput> {
    Ok(Json(platform.flows().generate_initial_learning_plan(&input).await?))
}

async fn micro_course(
    State(platform): State<AppState>,
    ApiJson(input): ApiJson<MicroCourseInput>,
) -> ApiResult<MicroCourse> {
    Ok(Json(platform.flows().generate_micro_course(&input).await?))
}

async fn generate_course(
    State(platform): State<AppState>,
    ApiJson(req): ApiJson<GenerateCourseRequest>,
) -> ApiResult<Course> {
    let course = platform
        .generate_course(&req.topic, req.publish, req.uid.as_deref())
        .await?;
    Ok(Json(course))
}

async fn creator_agent(
    State(platform): State<AppState>,
    ApiJson(req): ApiJson<AgentRequest>,
) -> ApiResult<CreatorAgentOutput> {
    let output = platform
        .run_creator_agent(&req.instruction, &req.history, req.uid.as_deref())
        .await?;
    Ok(Json(output))
}

/// Validate a course, or a single lesson when the body has no `lessons`.
async fn validate_content(ApiJson(body): ApiJson<serde_json::Value>) -> ApiResult<ValidateResponse> {
    let issues = if body.get("lessons").is_some() {
        let course: Course = serde_json::from_value(body)
            .map_err(|e| SprintError::InvalidInput(format!("not a course: {}", e)))?;
        validate_course(&course)
    } else {
        let lesson: Lesson = serde_json::from_value(body)
            .map_err(|e| SprintError::InvalidInput(format!("not a lesson: {}", e)))?;
        validate_lesson(&lesson)
    };
    Ok(Json(ValidateResponse {
        valid: issues.is_empty(),
        issues,
    }))
}

async fn register(
    State(platform): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> std::result::Result<(StatusCode, Json<UserProfile>), ApiError> {
    let uid = req
        .uid
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let profile = platform.register(&uid, &req.name, &req.email).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn get_profile(State(platform): State<AppState>, Path(uid): Path<String>) -> ApiResult<UserProfile> {
    Ok(Json(platform.profile(&uid).await?))
}

async fn dashboard(State(platform): State<AppState>, Path(uid): Path<String>) -> ApiResult<DashboardView> {
    Ok(Json(platform.dashboard(&uid).await?))
}

async fn suggestion(
    State(platform): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<SuggestionResponse> {
    Ok(Json(SuggestionResponse {
        suggestion: platform.suggestion(&uid).await?,
    }))
}

async fn set_active(
    State(platform): State<AppState>,
    Path(uid): Path<String>,
    ApiJson(req): ApiJson<ActiveRequest>,
) -> ApiResult<UserProfile> {
    Ok(Json(platform.set_active(&uid, &req.course_id, &req.lesson_id).await?))
}

async fn leaderboard(
    State(platform): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Vec<LeaderboardEntry>> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    Ok(Json(platform.leaderboard(limit).await?))
}
