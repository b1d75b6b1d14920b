//! Profile and leaderboard persistence.
//!
//! Provides a trait-based interface over the storage backends.

mod memory;
mod sqlite;

pub use memory::MemoryProfileStore;
pub use sqlite::SqliteProfileStore;

use crate::config::{Settings, StoreProvider};
use crate::error::{Result, SprintError};
use crate::profile::UserProfile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Leaderboard size when the caller does not ask for one.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub uid: String,
    pub name: String,
    pub avatar: String,
    pub xp: u64,
}

/// Trait for profile storage backends.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Store a new profile. Fails if the uid is taken.
    async fn create(&self, profile: &UserProfile) -> Result<()>;

    /// Fetch a profile by uid.
    async fn get(&self, uid: &str) -> Result<UserProfile>;

    /// Overwrite an existing profile.
    async fn save(&self, profile: &UserProfile) -> Result<()>;

    /// Apply `change` to a stored profile as one atomic read-modify-write.
    ///
    /// Concurrent updates to the same uid are serialized, so none is lost.
    async fn update(
        &self,
        uid: &str,
        change: &mut (dyn for<'p> FnMut(&'p mut UserProfile) + Send),
    ) -> Result<UserProfile>;

    /// Top profiles by XP, ties broken by name.
    async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>>;

    /// Number of stored profiles.
    async fn count(&self) -> Result<usize>;
}

/// Open the backend named in the settings.
pub fn open_store(settings: &Settings) -> Result<Arc<dyn ProfileStore>> {
    Ok(match settings.store.provider {
        StoreProvider::Sqlite => Arc::new(SqliteProfileStore::new(&settings.sqlite_path())?),
        StoreProvider::Memory => Arc::new(MemoryProfileStore::new()),
    })
}

pub(crate) fn not_found() -> SprintError {
    SprintError::NotFound("User profile not found".to_string())
}

pub(crate) fn duplicate(uid: &str) -> SprintError {
    SprintError::InvalidInput(format!("A profile for '{}' already exists", uid))
}

/// Rank profiles already sorted by XP.
pub(crate) fn rank(rows: impl IntoIterator<Item = (String, String, String, u64)>) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(i, (uid, name, avatar, xp))| LeaderboardEntry {
            rank: i + 1,
            uid,
            name,
            avatar,
            xp,
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every backend must share.

    use super::*;

    pub async fn exercise(store: &dyn ProfileStore) {
        assert_eq!(store.count().await.unwrap(), 0);

        let mut ada = UserProfile::new("u1", "Ada", "ada@example.com");
        let mut bob = UserProfile::new("u2", "Bob", "bob@example.com");
        let mut cy = UserProfile::new("u3", "Cy", "cy@example.com");
        store.create(&ada).await.unwrap();
        store.create(&bob).await.unwrap();
        store.create(&cy).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 3);

        let err = store.create(&ada).await.unwrap_err();
        assert!(matches!(err, SprintError::InvalidInput(_)));

        let err = store.get("nobody").await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: User profile not found");

        ada.xp = 120;
        bob.xp = 300;
        cy.xp = 120;
        ada.set_active("advanced-css", "2");
        ada.strengths.push(crate::profile::Metric {
            name: "Flexbox".to_string(),
            value: 90,
        });
        ada.last_active_on = chrono::NaiveDate::from_ymd_opt(2026, 3, 2);
        store.save(&ada).await.unwrap();
        store.save(&bob).await.unwrap();
        store.save(&cy).await.unwrap();

        assert_eq!(store.get("u1").await.unwrap(), ada);

        let updated = store.update("u3", &mut |p| p.xp += 5).await.unwrap();
        assert_eq!(updated.xp, 125);
        assert_eq!(store.get("u3").await.unwrap().xp, 125);
        assert!(matches!(
            store.update("nobody", &mut |p| p.xp += 5).await,
            Err(SprintError::NotFound(_))
        ));

        let board = store.leaderboard(10).await.unwrap();
        let order: Vec<_> = board.iter().map(|e| (e.rank, e.name.as_str())).collect();
        assert_eq!(order, vec![(1, "Bob"), (2, "Cy"), (3, "Ada")]);
        assert_eq!(store.leaderboard(2).await.unwrap().len(), 2);

        let ghost = UserProfile::new("ghost", "Ghost", "g@example.com");
        assert!(matches!(store.save(&ghost).await, Err(SprintError::NotFound(_))));
    }
}
