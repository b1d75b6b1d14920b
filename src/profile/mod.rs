//! Learner profiles, gamification rules and the dashboard view.

mod dashboard;
mod gamification;

pub use dashboard::{DashboardStats, DashboardView};
pub use gamification::{Award, Gamification, XpEvent};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Avatar used until the learner uploads one.
pub const PLACEHOLDER_AVATAR_URL: &str = "https://placehold.co/100x100.png";

/// A named score shown on the strengths/weaknesses chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub value: u32,
}

/// An earned badge. `icon` names an icon in the client's icon set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub icon: String,
}

impl Badge {
    pub fn new(name: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Everything the platform records about a learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub xp: u64,
    pub level: u32,
    pub daily_streak: u32,
    /// Percentage of the weekly XP goal, 0 to 100.
    pub weekly_progress: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_course_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_lesson_id: Option<String>,
    #[serde(default)]
    pub strengths: Vec<Metric>,
    #[serde(default)]
    pub weaknesses: Vec<Metric>,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub last_active_on: Option<NaiveDate>,
    /// XP earned in the ISO week named by `week_key`.
    #[serde(default)]
    pub weekly_xp: u64,
    #[serde(default)]
    pub week_key: Option<String>,
}

impl UserProfile {
    /// A fresh level-1 profile carrying the welcome badge.
    pub fn new(uid: &str, name: &str, email: &str) -> Self {
        Self {
            uid: uid.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar: PLACEHOLDER_AVATAR_URL.to_string(),
            xp: 0,
            level: 1,
            daily_streak: 0,
            weekly_progress: 0,
            active_course_id: None,
            active_lesson_id: None,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            badges: vec![Badge::new("Welcome", "Users")],
            last_active_on: None,
            weekly_xp: 0,
            week_key: None,
        }
    }

    pub fn has_badge(&self, name: &str) -> bool {
        self.badges.iter().any(|b| b.name == name)
    }

    /// Set the course and lesson shown under "continue learning".
    pub fn set_active(&mut self, course_id: &str, lesson_id: &str) {
        self.active_course_id = Some(course_id.to_string());
        self.active_lesson_id = Some(lesson_id.to_string());
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}
