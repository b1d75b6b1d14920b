use super::UserProfile;
use crate::content::{CourseCatalog, CourseInfo, Lesson, LessonOutline};
use crate::flows::SuggestionInput;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub xp: u64,
    pub level: u32,
    pub daily_streak: u32,
    pub weekly_progress: u32,
    pub badges: usize,
}

/// What the learner dashboard shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub profile: UserProfile,
    pub stats: DashboardStats,
    /// The course behind "continue learning", if it still exists.
    pub active_course: Option<CourseInfo>,
    pub active_lesson: Option<LessonOutline>,
    pub next_lesson: Option<LessonOutline>,
}

impl DashboardView {
    pub fn build(profile: UserProfile, catalog: &CourseCatalog) -> Self {
        let course = profile
            .active_course_id
            .as_deref()
            .and_then(|id| catalog.get(id));
        let lesson_id = profile.active_lesson_id.as_deref();

        let active_lesson = course
            .zip(lesson_id)
            .and_then(|(c, l)| c.lesson(l))
            .map(Lesson::outline);
        let next_lesson = course
            .zip(lesson_id)
            .and_then(|(c, l)| c.next_lesson(l))
            .map(Lesson::outline);

        let stats = DashboardStats {
            xp: profile.xp,
            level: profile.level,
            daily_streak: profile.daily_streak,
            weekly_progress: profile.weekly_progress,
            badges: profile.badges.len(),
        };

        Self {
            active_course: course.map(|c| c.info()),
            active_lesson,
            next_lesson,
            stats,
            profile,
        }
    }

    /// Input for the dashboard suggestion flow.
    pub fn suggestion_input(&self) -> SuggestionInput {
        SuggestionInput {
            active_course: self
                .active_course
                .as_ref()
                .map(|c| c.title.clone())
                .unwrap_or_else(|| "None".to_string()),
            strengths: self.profile.strengths.iter().map(|m| m.name.clone()).collect(),
            weaknesses: self.profile.weaknesses.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Metric;

    #[test]
    fn test_dashboard_with_active_course() {
        let catalog = CourseCatalog::bundled().unwrap();
        let mut profile = UserProfile::new("u1", "Ada", "ada@example.com");
        profile.set_active("react-fundamentals", "1");
        profile.strengths.push(Metric {
            name: "JSX".to_string(),
            value: 80,
        });

        let view = DashboardView::build(profile, &catalog);
        assert_eq!(view.active_course.as_ref().unwrap().title, "React Fundamentals");
        assert_eq!(view.active_lesson.as_ref().unwrap().title, "Introduction to React");
        assert_eq!(view.next_lesson.as_ref().unwrap().title, "Components and Props");
        assert_eq!(view.stats.level, 1);

        let input = view.suggestion_input();
        assert_eq!(input.active_course, "React Fundamentals");
        assert_eq!(input.strengths, vec!["JSX".to_string()]);
        assert!(input.weaknesses.is_empty());
    }

    #[test]
    fn test_dashboard_without_active_course() {
        let catalog = CourseCatalog::bundled().unwrap();
        let profile = UserProfile::new("u1", "Ada", "ada@example.com");
        let view = DashboardView::build(profile, &catalog);
        assert!(view.active_course.is_none());
        assert!(view.active_lesson.is_none());
        assert_eq!(view.suggestion_input().active_course, "None");
    }
}
