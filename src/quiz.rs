//! Practice and assessment quizzes.
//!
//! Answers are matched by exact string equality against the question's
//! declared correct option. A wrong practice answer fetches a hint from a
//! [`HintProvider`]; a failed hint never fails the check itself.

use crate::content::{Question, Quiz};
use crate::error::{Result, SprintError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Stored in place of a hint when the provider fails.
pub const HINT_FALLBACK: &str = "Could not load a hint, please try again.";

/// Something that can explain a wrong answer without giving it away.
#[async_trait]
pub trait HintProvider: Send + Sync {
    async fn hint(&self, question: &str, incorrect_answer: &str, correct_answer: &str)
        -> Result<String>;
}

/// Result of checking one practice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResult {
    pub is_correct: bool,
    pub hint: Option<String>,
}

/// A checked answer plus the message to show the learner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub question_index: usize,
    pub answer: String,
    pub is_correct: bool,
    pub hint: Option<String>,
    pub title: String,
    pub message: String,
    #[serde(skip)]
    correct_answer: String,
}

impl CheckOutcome {
    pub fn result(&self) -> PracticeResult {
        PracticeResult {
            is_correct: self.is_correct,
            hint: self.hint.clone(),
        }
    }

    /// The correct answer, shown only for a wrong answer that has no hint.
    pub fn reveal(&self) -> Option<String> {
        let has_hint = self.hint.as_deref().is_some_and(|h| !h.trim().is_empty());
        (!self.is_correct && !has_hint)
            .then(|| format!("The correct answer is: {}", self.correct_answer))
    }
}

/// Check `answer` against `question`, asking `hints` for help when it is wrong.
pub async fn check_answer(
    index: usize,
    question: &Question,
    answer: &str,
    hints: &dyn HintProvider,
) -> CheckOutcome {
    let is_correct = question.is_correct(answer);
    let mut outcome = CheckOutcome {
        question_index: index,
        answer: answer.to_string(),
        is_correct,
        hint: None,
        title: String::new(),
        message: String::new(),
        correct_answer: question.correct_answer.clone(),
    };

    if is_correct {
        outcome.title = "Correct!".to_string();
        outcome.message = "Great job, you got it right.".to_string();
        return outcome;
    }

    match hints
        .hint(&question.question, answer, &question.correct_answer)
        .await
    {
        Ok(hint) => {
            outcome.hint = Some(hint);
            outcome.title = "Not quite!".to_string();
            outcome.message = "Here's a hint to help you out.".to_string();
        }
        Err(e) => {
            warn!("Error getting hint for question {}: {}", index, e);
            outcome.hint = Some(HINT_FALLBACK.to_string());
            outcome.title = "Error".to_string();
            outcome.message = "Could not get a hint from the AI mentor.".to_string();
        }
    }
    outcome
}

/// Learner state while working through one practice quiz.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    quiz: Quiz,
    answers: HashMap<usize, String>,
    results: HashMap<usize, PracticeResult>,
}

impl PracticeSession {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            answers: HashMap::new(),
            results: HashMap::new(),
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Select an option for a question. Replaces any earlier selection.
    pub fn select(&mut self, index: usize, option: &str) -> Result<()> {
        let question = self.question(index)?;
        if !question.has_option(option) {
            return Err(SprintError::InvalidInput(format!(
                "'{}' is not an option for question {}",
                option,
                index + 1
            )));
        }
        self.answers.insert(index, option.to_string());
        Ok(())
    }

    pub fn selected(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn result(&self, index: usize) -> Option<&PracticeResult> {
        self.results.get(&index)
    }

    /// Check the selected answer for a question and store the result.
    pub async fn check(&mut self, index: usize, hints: &dyn HintProvider) -> Result<CheckOutcome> {
        let question = self.question(index)?.clone();
        let answer = self
            .answers
            .get(&index)
            .cloned()
            .ok_or_else(|| SprintError::InvalidInput("Select an answer first".to_string()))?;

        let outcome = check_answer(index, &question, &answer, hints).await;
        debug!("Practice question {} correct: {}", index, outcome.is_correct);
        self.results.insert(index, outcome.result());
        Ok(outcome)
    }

    fn question(&self, index: usize) -> Result<&Question> {
        self.quiz.questions.get(index).ok_or_else(|| {
            SprintError::InvalidInput(format!(
                "question index {} out of range (quiz has {})",
                index,
                self.quiz.questions.len()
            ))
        })
    }
}

/// Per-question line of an assessment report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question: String,
    pub answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub correct: usize,
    pub total: usize,
    /// Rounded down; 0 for an empty quiz.
    pub percentage: u32,
    pub passed: bool,
    pub results: Vec<QuestionResult>,
}

/// Grade a full set of answers. Missing answers count as wrong.
pub fn grade_assessment(
    quiz: &Quiz,
    answers: &[Option<String>],
    pass_mark: u32,
) -> Result<AssessmentReport> {
    if answers.len() > quiz.questions.len() {
        return Err(SprintError::InvalidInput(format!(
            "got {} answers for {} questions",
            answers.len(),
            quiz.questions.len()
        )));
    }

    let results = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = answers.get(i).cloned().flatten();
            QuestionResult {
                question: q.question.clone(),
                is_correct: answer.as_deref().is_some_and(|a| q.is_correct(a)),
                answer,
                correct_answer: q.correct_answer.clone(),
            }
        })
        .collect::<Vec<_>>();

    let total = results.len();
    let correct = results.iter().filter(|r| r.is_correct).count();
    let percentage = if total == 0 {
        0
    } else {
        (correct * 100 / total) as u32
    };

    Ok(AssessmentReport {
        correct,
        total,
        percentage,
        passed: total > 0 && percentage >= pass_mark,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedHint {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedHint {
        fn ok(text: &'static str) -> Self {
            Self {
                reply: Some(text),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HintProvider for FixedHint {
        async fn hint(&self, _q: &str, _wrong: &str, _right: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(String::from)
                .ok_or_else(|| SprintError::OpenAI("unavailable".to_string()))
        }
    }

    fn quiz() -> Quiz {
        Quiz {
            questions: vec![
                Question {
                    question: "What color is the sky?".to_string(),
                    options: vec!["Blue".to_string(), "Green".to_string()],
                    correct_answer: "Blue".to_string(),
                },
                Question {
                    question: "2 + 2?".to_string(),
                    options: vec!["3".to_string(), "4".to_string()],
                    correct_answer: "4".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_correct_answer_skips_hint() {
        let hints = FixedHint::ok("unused");
        let mut session = PracticeSession::new(quiz());
        session.select(0, "Blue").unwrap();

        let outcome = session.check(0, &hints).await.unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.title, "Correct!");
        assert_eq!(outcome.hint, None);
        assert_eq!(outcome.reveal(), None);
        assert_eq!(hints.calls.load(Ordering::SeqCst), 0);
        assert!(session.result(0).unwrap().is_correct);
    }

    #[tokio::test]
    async fn test_wrong_answer_gets_hint() {
        let hints = FixedHint::ok("Think about a clear day.");
        let mut session = PracticeSession::new(quiz());
        session.select(0, "Green").unwrap();

        let outcome = session.check(0, &hints).await.unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.title, "Not quite!");
        assert_eq!(outcome.message, "Here's a hint to help you out.");
        assert_eq!(outcome.hint.as_deref(), Some("Think about a clear day."));
        assert_eq!(outcome.reveal(), None);
        assert_eq!(
            session.result(0),
            Some(&PracticeResult {
                is_correct: false,
                hint: Some("Think about a clear day.".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_hint_failure_uses_fallback() {
        let hints = FixedHint::failing();
        let mut session = PracticeSession::new(quiz());
        session.select(1, "3").unwrap();

        let outcome = session.check(1, &hints).await.unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.hint.as_deref(), Some(HINT_FALLBACK));
    }

    #[tokio::test]
    async fn test_empty_hint_reveals_answer() {
        let hints = FixedHint::ok("");
        let outcome = check_answer(1, &quiz().questions[1], "3", &hints).await;
        assert_eq!(outcome.reveal().as_deref(), Some("The correct answer is: 4"));
    }

    #[tokio::test]
    async fn test_check_requires_selection() {
        let hints = FixedHint::ok("unused");
        let mut session = PracticeSession::new(quiz());
        let err = session.check(0, &hints).await.unwrap_err();
        assert!(matches!(err, SprintError::InvalidInput(_)));
    }

    #[test]
    fn test_select_validates_option_and_index() {
        let mut session = PracticeSession::new(quiz());
        assert!(session.select(0, "Purple").is_err());
        assert!(session.select(5, "Blue").is_err());
        session.select(0, "Green").unwrap();
        session.select(0, "Blue").unwrap();
        assert_eq!(session.selected(0), Some("Blue"));
    }

    #[test]
    fn test_match_is_exact() {
        let q = &quiz().questions[0];
        assert!(q.is_correct("Blue"));
        assert!(!q.is_correct("blue"));
        assert!(!q.is_correct(" Blue"));
    }

    #[test]
    fn test_grade_assessment() {
        let report = grade_assessment(
            &quiz(),
            &[Some("Blue".to_string()), Some("3".to_string())],
            70,
        )
        .unwrap();
        assert_eq!(report.correct, 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.percentage, 50);
        assert!(!report.passed);

        let report = grade_assessment(&quiz(), &[Some("Blue".to_string())], 50).unwrap();
        assert_eq!(report.percentage, 50);
        assert!(report.passed);
        assert_eq!(report.results[1].answer, None);
    }

    #[test]
    fn test_grade_empty_and_oversized() {
        let report = grade_assessment(&Quiz::default(), &[], 70).unwrap();
        assert_eq!(report.percentage, 0);
        assert!(!report.passed);

        let answers = vec![None, None, None];
        assert!(grade_assessment(&quiz(), &answers, 70).is_err());
    }
}
