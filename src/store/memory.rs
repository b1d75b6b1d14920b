//! In-memory profile store.
//!
//! Useful for testing and throwaway servers.

use super::{duplicate, not_found, rank, LeaderboardEntry, ProfileStore};
use crate::error::{Result, SprintError};
use crate::profile::UserProfile;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory profile store.
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> SprintError {
    SprintError::Store(format!("Failed to acquire lock: {}", e))
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn create(&self, profile: &UserProfile) -> Result<()> {
        let mut profiles = self.profiles.write().map_err(poisoned)?;
        if profiles.contains_key(&profile.uid) {
            return Err(duplicate(&profile.uid));
        }
        profiles.insert(profile.uid.clone(), profile.clone());
        Ok(())
    }

    async fn get(&self, uid: &str) -> Result<UserProfile> {
        let profiles = self.profiles.read().map_err(poisoned)?;
        profiles.get(uid).cloned().ok_or_else(not_found)
    }

    async fn save(&self, profile: &UserProfile) -> Result<()> {
        let mut profiles = self.profiles.write().map_err(poisoned)?;
        match profiles.get_mut(&profile.uid) {
            Some(slot) => {
                *slot = profile.clone();
                Ok(())
            }
            None => Err(not_found()),
        }
    }

    async fn update(
        &self,
        uid: &str,
        change: &mut (dyn for<'p> FnMut(&'p mut UserProfile) + Send),
    ) -> Result<UserProfile> {
        let mut profiles = self.profiles.write().map_err(poisoned)?;
        let profile = profiles.get_mut(uid).ok_or_else(not_found)?;
        change(profile);
        Ok(profile.clone())
    }

    async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let profiles = self.profiles.read().map_err(poisoned)?;
        let mut sorted: Vec<&UserProfile> = profiles.values().collect();
        sorted.sort_by(|a, b| b.xp.cmp(&a.xp).then_with(|| a.name.cmp(&b.name)));
        sorted.truncate(limit);

        Ok(rank(
            sorted
                .into_iter()
                .map(|p| (p.uid.clone(), p.name.clone(), p.avatar.clone(), p.xp)),
        ))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.profiles.read().map_err(poisoned)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[tokio::test]
    async fn test_memory_store_contract() {
        let store = MemoryProfileStore::new();
        contract::exercise(&store).await;
    }
}
