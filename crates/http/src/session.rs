//! Session extraction from request headers.
//!
//! Identity arrives as an opaque user id in `X-User-Id` (sign-in itself is
//! handled upstream). The id is resolved against profiles to pick up the
//! display name when one exists; an id without a profile row is still a
//! valid session.

use axum::http::HeaderMap;
use stitchtrack_core::UserSession;

use crate::api_error::ApiError;
use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Session for the caller, or `None` for anonymous requests.
pub async fn maybe_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<UserSession>, ApiError> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let user_id = value
        .to_str()
        .map_err(|_| ApiError::BadRequest("invalid x-user-id header".to_owned()))?
        .trim();
    if user_id.is_empty() {
        return Ok(None);
    }
    let profile = state
        .catalog
        .get_profile(user_id)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    let display_name = profile.and_then(|p| p.name);
    Ok(Some(UserSession::new(user_id, display_name)))
}
