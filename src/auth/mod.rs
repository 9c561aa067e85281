//! Caller identity.
//!
//! Authentication itself lives upstream; this server only needs the
//! resolved user identity, carried in the `x-user-id` header by the
//! gateway. The extractor turns it into [`CurrentUser`] so protected
//! handlers just declare the parameter.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::core::{AppError, ServerState};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the caller for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty());

        match user_id {
            Some(id) => {
                let user = CurrentUser { user_id: id.to_string() };
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            None => {
                warn!(uri = %parts.uri, "Request without user identity");
                Err(AppError::Unauthorized)
            }
        }
    }
}
