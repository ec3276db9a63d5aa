use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashSet;

use super::api::error::ErrorResponse;
use super::config::Permission;
use super::server::AppState;

/// Caller identified by a Bearer API key.
#[derive(Clone)]
pub struct Operator {
    pub name: String,
    pub permissions: HashSet<Permission>,
}

impl Operator {
    pub fn require(&self, permission: Permission) -> Result<(), AuthError> {
        if self.permissions.contains(&permission) {
            Ok(())
        } else {
            log::warn!("{} lacks {:?}", self.name, permission);
            Err(AuthError::Forbidden)
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidFormat,
    InvalidKey,
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AuthError::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Missing Authorization header",
            ),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Expected 'Bearer <key>'",
            ),
            AuthError::InvalidKey => (StatusCode::UNAUTHORIZED, "unauthorized", "Invalid API key"),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "Insufficient permissions",
            ),
        };
        (status, Json(ErrorResponse::with_message(error, message))).into_response()
    }
}

impl FromRequestParts<AppState> for Operator {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuth)?
            .to_str()
            .map_err(|_| AuthError::InvalidFormat)?;

        let key = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidFormat)?;

        state
            .config
            .find_api_key(key)
            .map(|api_key| Operator {
                name: api_key.name.clone(),
                permissions: api_key.permissions.clone(),
            })
            .ok_or(AuthError::InvalidKey)
    }
}
