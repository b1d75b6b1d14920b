//! SQLite-based profile store.
//!
//! List fields (strengths, weaknesses, badges) are stored as JSON text.

use super::{duplicate, not_found, rank, LeaderboardEntry, ProfileStore};
use crate::error::{Result, SprintError};
use crate::profile::UserProfile;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS profiles (
        uid TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        avatar TEXT NOT NULL,
        xp INTEGER NOT NULL DEFAULT 0,
        level INTEGER NOT NULL DEFAULT 1,
        daily_streak INTEGER NOT NULL DEFAULT 0,
        weekly_progress INTEGER NOT NULL DEFAULT 0,
        active_course_id TEXT,
        active_lesson_id TEXT,
        strengths TEXT NOT NULL DEFAULT '[]',
        weaknesses TEXT NOT NULL DEFAULT '[]',
        badges TEXT NOT NULL DEFAULT '[]',
        last_active_on TEXT,
        weekly_xp INTEGER NOT NULL DEFAULT 0,
        week_key TEXT,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_profiles_xp ON profiles(xp DESC, name ASC);
"#;

const COLUMNS: &str = "uid, name, email, avatar, xp, level, daily_streak, weekly_progress, \
    active_course_id, active_lesson_id, strengths, weaknesses, badges, last_active_on, \
    weekly_xp, week_key";

/// SQLite-based profile store.
pub struct SqliteProfileStore {
    conn: Mutex<Connection>,
}

impl SqliteProfileStore {
    /// Open (or create) a store at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite profile store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SprintError::Store(format!("Failed to acquire lock: {}", e)))
    }
}

/// Column values for a profile, in [`COLUMNS`] order.
struct ProfileRow {
    strengths: String,
    weaknesses: String,
    badges: String,
    last_active_on: Option<String>,
}

impl ProfileRow {
    fn encode(profile: &UserProfile) -> Result<Self> {
        Ok(Self {
            strengths: serde_json::to_string(&profile.strengths)?,
            weaknesses: serde_json::to_string(&profile.weaknesses)?,
            badges: serde_json::to_string(&profile.badges)?,
            last_active_on: profile.last_active_on.map(|d| d.to_string()),
        })
    }
}

fn read_profile(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let strengths: String = row.get(10)?;
    let weaknesses: String = row.get(11)?;
    let badges: String = row.get(12)?;
    let last_active_on: Option<String> = row.get(13)?;
    let xp: i64 = row.get(4)?;
    let weekly_xp: i64 = row.get(14)?;

    Ok(UserProfile {
        uid: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        avatar: row.get(3)?,
        xp: xp.max(0) as u64,
        level: row.get(5)?,
        daily_streak: row.get(6)?,
        weekly_progress: row.get(7)?,
        active_course_id: row.get(8)?,
        active_lesson_id: row.get(9)?,
        strengths: json_column(10, &strengths)?,
        weaknesses: json_column(11, &weaknesses)?,
        badges: json_column(12, &badges)?,
        last_active_on: last_active_on.and_then(|s| s.parse::<NaiveDate>().ok()),
        weekly_xp: weekly_xp.max(0) as u64,
        week_key: row.get(15)?,
    })
}

fn json_column<T: serde::de::DeserializeOwned>(index: usize, text: &str) -> rusqlite::Result<T> {
    serde_json::from_str(text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Overwrite the row for `profile.uid`, returning the number of rows changed.
fn write_profile(conn: &Connection, profile: &UserProfile) -> Result<usize> {
    let encoded = ProfileRow::encode(profile)?;
    let updated = conn.execute(
        r#"
        UPDATE profiles SET
            name = ?2, email = ?3, avatar = ?4, xp = ?5, level = ?6,
            daily_streak = ?7, weekly_progress = ?8, active_course_id = ?9,
            active_lesson_id = ?10, strengths = ?11, weaknesses = ?12, badges = ?13,
            last_active_on = ?14, weekly_xp = ?15, week_key = ?16, updated_at = ?17
        WHERE uid = ?1
        "#,
        params![
            profile.uid,
            profile.name,
            profile.email,
            profile.avatar,
            profile.xp as i64,
            profile.level,
            profile.daily_streak,
            profile.weekly_progress,
            profile.active_course_id,
            profile.active_lesson_id,
            encoded.strengths,
            encoded.weaknesses,
            encoded.badges,
            encoded.last_active_on,
            profile.weekly_xp as i64,
            profile.week_key,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(updated)
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation)
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    #[instrument(skip(self, profile), fields(uid = %profile.uid))]
    async fn create(&self, profile: &UserProfile) -> Result<()> {
        let encoded = ProfileRow::encode(profile)?;
        let conn = self.lock()?;

        let inserted = conn.execute(
            &format!(
                "INSERT INTO profiles ({}, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                COLUMNS
            ),
            params![
                profile.uid,
                profile.name,
                profile.email,
                profile.avatar,
                profile.xp as i64,
                profile.level,
                profile.daily_streak,
                profile.weekly_progress,
                profile.active_course_id,
                profile.active_lesson_id,
                encoded.strengths,
                encoded.weaknesses,
                encoded.badges,
                encoded.last_active_on,
                profile.weekly_xp as i64,
                profile.week_key,
                Utc::now().to_rfc3339(),
            ],
        );

        match inserted {
            Ok(_) => {
                debug!("Created profile {}", profile.uid);
                Ok(())
            }
            Err(e) if is_constraint_violation(&e) => Err(duplicate(&profile.uid)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get(&self, uid: &str) -> Result<UserProfile> {
        let conn = self.lock()?;
        let profile = conn
            .query_row(
                &format!("SELECT {} FROM profiles WHERE uid = ?1", COLUMNS),
                params![uid],
                read_profile,
            )
            .optional()?;
        profile.ok_or_else(not_found)
    }

    #[instrument(skip(self, profile), fields(uid = %profile.uid))]
    async fn save(&self, profile: &UserProfile) -> Result<()> {
        let conn = self.lock()?;
        if write_profile(&conn, profile)? == 0 {
            return Err(not_found());
        }
        debug!("Saved profile {}", profile.uid);
        Ok(())
    }

    #[instrument(skip(self, change))]
    async fn update(
        &self,
        uid: &str,
        change: &mut (dyn for<'p> FnMut(&'p mut UserProfile) + Send),
    ) -> Result<UserProfile> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut profile = tx
            .query_row(
                &format!("SELECT {} FROM profiles WHERE uid = ?1", COLUMNS),
                params![uid],
                read_profile,
            )
            .optional()?
            .ok_or_else(not_found)?;
        change(&mut profile);
        write_profile(&tx, &profile)?;
        tx.commit()?;

        debug!("Updated profile {}", uid);
        Ok(profile)
    }

    #[instrument(skip(self))]
    async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT uid, name, avatar, xp FROM profiles ORDER BY xp DESC, name ASC LIMIT ?1",
        )?;

        let rows: Vec<(String, String, String, u64)> = stmt
            .query_map(params![limit as i64], |row| {
                let xp: i64 = row.get(3)?;
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, xp.max(0) as u64))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rank(rows))
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[tokio::test]
    async fn test_sqlite_store_contract() {
        let store = SqliteProfileStore::in_memory().unwrap();
        contract::exercise(&store).await;
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profiles.db");

        {
            let store = SqliteProfileStore::new(&path).unwrap();
            let mut p = UserProfile::new("u1", "Ada", "ada@example.com");
            store.create(&p).await.unwrap();
            p.xp = 42;
            store.save(&p).await.unwrap();
        }

        let store = SqliteProfileStore::new(&path).unwrap();
        let p = store.get("u1").await.unwrap();
        assert_eq!(p.xp, 42);
        assert!(p.has_badge("Welcome"));
    }
}
