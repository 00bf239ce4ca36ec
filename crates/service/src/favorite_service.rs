//! Favorite membership: a binary flag per (user, pattern).

use std::sync::Arc;

use stitchtrack_core::{Favorite, UserSession};
use stitchtrack_storage::traits::{FavoriteStore, PatternStore};

use crate::error::{require_session, Result, ServiceError};

pub struct FavoriteService {
    favorites: Arc<dyn FavoriteStore>,
    patterns: Arc<dyn PatternStore>,
}

impl FavoriteService {
    pub fn new(favorites: Arc<dyn FavoriteStore>, patterns: Arc<dyn PatternStore>) -> Self {
        Self { favorites, patterns }
    }

    /// Current membership. Anonymous viewers simply see `false`.
    pub async fn status(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
    ) -> Result<bool> {
        let Some(session) = session else { return Ok(false) };
        Ok(self.favorites.is_favorited(&session.user_id, pattern_id).await?)
    }

    /// Flips membership and returns the new state.
    ///
    /// Write-then-report: the storage mutation runs first and the returned
    /// flag is derived from its success, so callers never show a state the
    /// store did not confirm. Anonymous callers are rejected with no
    /// storage traffic.
    pub async fn toggle(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
    ) -> Result<bool> {
        let session = require_session(session)?;
        if self.favorites.is_favorited(&session.user_id, pattern_id).await? {
            self.favorites.remove_favorite(&session.user_id, pattern_id).await?;
            tracing::debug!(pattern_id, user_id = %session.user_id, "favorite removed");
            Ok(false)
        } else {
            self.patterns
                .get_pattern(pattern_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("pattern", pattern_id))?;
            self.favorites
                .add_favorite(&Favorite::new(&session.user_id, pattern_id))
                .await?;
            tracing::debug!(pattern_id, user_id = %session.user_id, "favorite added");
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_storage;

    fn session() -> UserSession {
        UserSession::new("user-1", None)
    }

    #[tokio::test]
    async fn double_toggle_returns_to_original_state() {
        let (service, storage, _dir) = test_storage::favorite_service();
        let pattern_id = test_storage::seed_pattern(&storage, 1);

        assert!(!service.status(Some(&session()), &pattern_id).await.unwrap());
        assert!(service.toggle(Some(&session()), &pattern_id).await.unwrap());
        assert!(service.status(Some(&session()), &pattern_id).await.unwrap());
        assert!(!service.toggle(Some(&session()), &pattern_id).await.unwrap());
        assert!(!service.status(Some(&session()), &pattern_id).await.unwrap());
        assert_eq!(storage.get_stats().unwrap().favorite_count, 0);
    }

    #[tokio::test]
    async fn anonymous_toggle_mutates_nothing() {
        let (service, storage, _dir) = test_storage::favorite_service();
        let pattern_id = test_storage::seed_pattern(&storage, 1);

        let err = service.toggle(None, &pattern_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated));
        assert_eq!(storage.get_stats().unwrap().favorite_count, 0);
        // anonymous status reads as not-favorited rather than erroring
        assert!(!service.status(None, &pattern_id).await.unwrap());
    }

    #[tokio::test]
    async fn favoriting_missing_pattern_is_not_found() {
        let (service, _storage, _dir) = test_storage::favorite_service();
        let err = service.toggle(Some(&session()), "missing").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
