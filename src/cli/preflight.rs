//! Pre-flight checks before model-backed operations.

use crate::error::{Result, SprintError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Anything that calls the hosted model.
    Ai,
    /// Catalog, validation and leaderboard work locally.
    Local,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Ai => check_api_key(std::env::var("OPENAI_API_KEY").ok().as_deref()),
        Operation::Local => Ok(()),
    }
}

fn check_api_key(key: Option<&str>) -> Result<()> {
    match key {
        Some(k) if !k.trim().is_empty() => Ok(()),
        Some(_) => Err(SprintError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        None => Err(SprintError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_has_no_requirements() {
        assert!(check(Operation::Local).is_ok());
    }

    #[test]
    fn test_api_key_checks() {
        assert!(check_api_key(Some("sk-test")).is_ok());
        assert!(matches!(check_api_key(Some("  ")), Err(SprintError::Config(_))));
        assert!(check_api_key(None).unwrap_err().to_string().contains("not set"));
    }
}
