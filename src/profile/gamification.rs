//! XP, levels, streaks, weekly goals and badges.

use super::{Badge, UserProfile};
use crate::config::GamificationSettings;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

/// Something a learner did that earns XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpEvent {
    PracticeCorrect,
    AssessmentPassed,
    /// A project evaluated with the given 0-100 score.
    ProjectEvaluated { score: u32 },
    /// Accepted a generated lesson or course. Earns a badge, not XP.
    ContentCreated,
}

/// What one event changed on a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub xp_gained: u64,
    pub xp: u64,
    pub level: u32,
    pub level_up: bool,
    pub daily_streak: u32,
    pub weekly_progress: u32,
    pub new_badges: Vec<Badge>,
}

/// Gamification rules, configured from [`GamificationSettings`].
#[derive(Debug, Clone)]
pub struct Gamification {
    practice_xp: u64,
    assessment_xp: u64,
    level_size: u64,
    weekly_goal_xp: u64,
}

const STREAK_BADGE_DAYS: u32 = 7;
const SCHOLAR_LEVEL: u32 = 5;

impl Gamification {
    pub fn new(settings: &GamificationSettings) -> Self {
        Self {
            practice_xp: settings.practice_xp,
            assessment_xp: settings.assessment_xp,
            level_size: settings.level_size.max(1),
            weekly_goal_xp: settings.weekly_goal_xp,
        }
    }

    pub fn xp_for(&self, event: XpEvent) -> u64 {
        match event {
            XpEvent::PracticeCorrect => self.practice_xp,
            XpEvent::AssessmentPassed => self.assessment_xp,
            XpEvent::ProjectEvaluated { score } => u64::from(score.min(100)) / 2,
            XpEvent::ContentCreated => 0,
        }
    }

    pub fn level_for(&self, xp: u64) -> u32 {
        u32::try_from(xp / self.level_size + 1).unwrap_or(u32::MAX)
    }

    /// Apply an event that happened on `today`.
    pub fn award(&self, profile: &mut UserProfile, event: XpEvent, today: NaiveDate) -> Award {
        let before = profile.badges.len();
        let old_level = profile.level;

        self.record_activity(profile, today);
        let gained = self.xp_for(event);
        self.award_xp(profile, gained, today);

        if gained > 0 {
            unlock(profile, "First Steps", "Star");
        }
        if profile.daily_streak >= STREAK_BADGE_DAYS {
            unlock(profile, "On Fire", "Flame");
        }
        if profile.level >= SCHOLAR_LEVEL {
            unlock(profile, "Scholar", "Award");
        }
        if event == XpEvent::ContentCreated {
            unlock(profile, "Creator", "GitMerge");
        }

        debug!(
            "Awarded {} XP to {} (level {}, streak {})",
            gained, profile.uid, profile.level, profile.daily_streak
        );

        Award {
            xp_gained: gained,
            xp: profile.xp,
            level: profile.level,
            level_up: profile.level > old_level,
            daily_streak: profile.daily_streak,
            weekly_progress: profile.weekly_progress,
            new_badges: profile.badges[before..].to_vec(),
        }
    }

    /// Add XP and recompute the level and weekly progress.
    pub fn award_xp(&self, profile: &mut UserProfile, amount: u64, today: NaiveDate) {
        self.roll_week(profile, today);
        profile.xp += amount;
        profile.weekly_xp += amount;
        profile.level = self.level_for(profile.xp);
        profile.weekly_progress = self.weekly_progress(profile.weekly_xp);
    }

    /// Update the daily streak for activity on `today`.
    pub fn record_activity(&self, profile: &mut UserProfile, today: NaiveDate) {
        profile.daily_streak = match profile.last_active_on {
            Some(last) if last == today => profile.daily_streak.max(1),
            Some(last) if last.succ_opt() == Some(today) => profile.daily_streak + 1,
            _ => 1,
        };
        profile.last_active_on = Some(today);
    }

    /// Bring time-based fields up to date without recording activity.
    ///
    /// A broken streak reads as 0 and a new week starts at 0% progress.
    pub fn refresh(&self, profile: &mut UserProfile, today: NaiveDate) {
        if let Some(last) = profile.last_active_on {
            if last != today && last.succ_opt() != Some(today) {
                profile.daily_streak = 0;
            }
        }
        self.roll_week(profile, today);
        profile.weekly_progress = self.weekly_progress(profile.weekly_xp);
    }

    fn roll_week(&self, profile: &mut UserProfile, today: NaiveDate) {
        let key = week_key(today);
        if profile.week_key.as_deref() != Some(key.as_str()) {
            profile.week_key = Some(key);
            profile.weekly_xp = 0;
        }
    }

    fn weekly_progress(&self, weekly_xp: u64) -> u32 {
        if self.weekly_goal_xp == 0 {
            return if weekly_xp > 0 { 100 } else { 0 };
        }
        (weekly_xp * 100 / self.weekly_goal_xp).min(100) as u32
    }
}

fn unlock(profile: &mut UserProfile, name: &str, icon: &str) {
    if !profile.has_badge(name) {
        profile.badges.push(Badge::new(name, icon));
    }
}

/// ISO week label such as `2026-W07`.
fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Gamification {
        Gamification::new(&GamificationSettings::default())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_xp_values() {
        let g = rules();
        assert_eq!(g.xp_for(XpEvent::PracticeCorrect), 10);
        assert_eq!(g.xp_for(XpEvent::AssessmentPassed), 50);
        assert_eq!(g.xp_for(XpEvent::ProjectEvaluated { score: 87 }), 43);
        assert_eq!(g.xp_for(XpEvent::ContentCreated), 0);
    }

    #[test]
    fn test_levels() {
        let g = rules();
        assert_eq!(g.level_for(0), 1);
        assert_eq!(g.level_for(999), 1);
        assert_eq!(g.level_for(1000), 2);
        assert_eq!(g.level_for(4500), 5);
    }

    #[test]
    fn test_streak_rules() {
        let g = rules();
        let mut p = UserProfile::new("u", "U", "u@example.com");

        g.record_activity(&mut p, day(2026, 3, 2));
        assert_eq!(p.daily_streak, 1);
        g.record_activity(&mut p, day(2026, 3, 2));
        assert_eq!(p.daily_streak, 1);
        g.record_activity(&mut p, day(2026, 3, 3));
        assert_eq!(p.daily_streak, 2);
        g.record_activity(&mut p, day(2026, 3, 6));
        assert_eq!(p.daily_streak, 1);
    }

    #[test]
    fn test_first_award_unlocks_first_steps() {
        let g = rules();
        let mut p = UserProfile::new("u", "U", "u@example.com");
        let award = g.award(&mut p, XpEvent::PracticeCorrect, day(2026, 3, 2));

        assert_eq!(award.xp_gained, 10);
        assert_eq!(award.new_badges, vec![Badge::new("First Steps", "Star")]);
        assert!(!award.level_up);
        assert_eq!(p.weekly_progress, 2);

        let award = g.award(&mut p, XpEvent::PracticeCorrect, day(2026, 3, 2));
        assert!(award.new_badges.is_empty());
    }

    #[test]
    fn test_level_up_and_scholar() {
        let g = rules();
        let mut p = UserProfile::new("u", "U", "u@example.com");
        p.xp = 3990;
        p.level = 4;
        let award = g.award(&mut p, XpEvent::PracticeCorrect, day(2026, 3, 2));
        assert!(award.level_up);
        assert_eq!(award.level, 5);
        assert!(p.has_badge("Scholar"));
    }

    #[test]
    fn test_on_fire_after_seven_days() {
        let g = rules();
        let mut p = UserProfile::new("u", "U", "u@example.com");
        let start = day(2026, 3, 2);
        for i in 0..7 {
            let today = start + chrono::Duration::days(i);
            g.award(&mut p, XpEvent::PracticeCorrect, today);
        }
        assert_eq!(p.daily_streak, 7);
        assert!(p.has_badge("On Fire"));
    }

    #[test]
    fn test_weekly_progress_resets_on_new_week() {
        let g = rules();
        let mut p = UserProfile::new("u", "U", "u@example.com");
        // 2026-03-02 is a Monday.
        for _ in 0..12 {
            g.award(&mut p, XpEvent::AssessmentPassed, day(2026, 3, 4));
        }
        assert_eq!(p.weekly_progress, 100);

        g.award(&mut p, XpEvent::PracticeCorrect, day(2026, 3, 9));
        assert_eq!(p.weekly_xp, 10);
        assert_eq!(p.weekly_progress, 2);
    }

    #[test]
    fn test_content_created_badge() {
        let g = rules();
        let mut p = UserProfile::new("u", "U", "u@example.com");
        let award = g.award(&mut p, XpEvent::ContentCreated, day(2026, 3, 2));
        assert_eq!(award.xp_gained, 0);
        assert_eq!(award.new_badges, vec![Badge::new("Creator", "GitMerge")]);
    }

    #[test]
    fn test_refresh_breaks_stale_streak() {
        let g = rules();
        let mut p = UserProfile::new("u", "U", "u@example.com");
        g.award(&mut p, XpEvent::PracticeCorrect, day(2026, 3, 2));
        g.refresh(&mut p, day(2026, 3, 3));
        assert_eq!(p.daily_streak, 1);
        g.refresh(&mut p, day(2026, 3, 20));
        assert_eq!(p.daily_streak, 0);
        assert_eq!(p.weekly_progress, 0);
    }

    #[test]
    fn test_week_key() {
        assert_eq!(week_key(day(2026, 1, 1)), "2026-W01");
        assert_eq!(week_key(day(2027, 1, 1)), "2026-W53");
    }
}
