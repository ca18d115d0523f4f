use crate::auth::models::UserContext;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use roomcast_core::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Configured API keys and the user each one maps to.
#[derive(Clone)]
pub struct AuthState {
    keys: HashMap<String, String>,
}

impl AuthState {
    pub fn new(keys: HashMap<String, String>) -> Self {
        Self { keys }
    }

    /// Resolve a presented key to its user id. Every configured key is
    /// compared in constant time so the scan does not leak which prefix
    /// matched.
    fn resolve_user(&self, token: &str) -> Option<&str> {
        let mut matched: Option<&str> = None;
        for (key, user_id) in &self.keys {
            if secure_compare(token, key) {
                matched = Some(user_id.as_str());
            }
        }
        matched
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::debug!("Rejected request without authorization header");
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    if !auth_header.starts_with("Bearer ") {
        tracing::debug!("Rejected request with malformed authorization header");
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    match auth_state.resolve_user(token) {
        Some(user_id) => {
            let user_id = user_id.to_string();
            tracing::debug!(user_id = %user_id, "Authenticated request");
            request.extensions_mut().insert(UserContext { user_id });
            next.run(request).await
        }
        None => {
            tracing::debug!("Rejected request with unknown API key");
            HttpAppError(AppError::Unauthorized("Invalid API key".to_string())).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_state() -> AuthState {
        let mut keys = HashMap::new();
        keys.insert("alpha-key".to_string(), "alice".to_string());
        keys.insert("beta-key".to_string(), "bob".to_string());
        AuthState::new(keys)
    }

    #[test]
    fn test_secure_compare() {
        assert!(secure_compare("same-token", "same-token"));
        assert!(!secure_compare("same-token", "SAME-TOKEN"));
        assert!(!secure_compare("short", "longer-token"));
        assert!(!secure_compare("", "x"));
        assert!(secure_compare("", ""));
    }

    #[test]
    fn test_resolve_user() {
        let state = auth_state();
        assert_eq!(state.resolve_user("alpha-key"), Some("alice"));
        assert_eq!(state.resolve_user("beta-key"), Some("bob"));
        assert_eq!(state.resolve_user("alpha-key "), None);
        assert_eq!(state.resolve_user("gamma-key"), None);
        assert_eq!(state.resolve_user(""), None);
    }
}
