// ViewerContext Middleware - resolves the caller before any handler runs
// Creates ViewerContext from the Authorization header and injects it into request extensions

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    infrastructure::viewer::ViewerContext,
};

/// Authentication information extracted from request headers
#[derive(Debug, Clone, PartialEq)]
pub struct AuthInfo {
    pub token: Option<String>,
    pub auth_method: Option<String>,
}

/// Creates the request-scoped viewer context. Unknown tokens are rejected
/// outright rather than downgraded to anonymous.
pub async fn viewer_context_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_info = extract_auth_from_request(request.headers())?;
    let viewer_context = create_viewer_context(auth_info, &app_state).await?;

    request.extensions_mut().insert(viewer_context);
    Ok(next.run(request).await)
}

/// Accepts `Bearer <token>` and `Token <token>` authorization schemes.
pub(crate) fn extract_auth_from_request(headers: &HeaderMap) -> AppResult<AuthInfo> {
    let Some(auth_header) = headers.get("authorization") else {
        return Ok(AuthInfo {
            token: None,
            auth_method: None,
        });
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header.".to_string()))?;

    let (method, token) = if let Some(token) = auth_str.strip_prefix("Bearer ") {
        ("bearer", token)
    } else if let Some(token) = auth_str.strip_prefix("Token ") {
        ("token", token)
    } else {
        return Err(AppError::Unauthorized(
            "Unsupported authorization scheme.".to_string(),
        ));
    };

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized(
            "Invalid token header. No credentials provided.".to_string(),
        ));
    }

    Ok(AuthInfo {
        token: Some(token.to_string()),
        auth_method: Some(method.to_string()),
    })
}

async fn create_viewer_context(
    auth_info: AuthInfo,
    app_state: &AppState,
) -> AppResult<Arc<ViewerContext>> {
    let request_id = format!("req-{}", Uuid::new_v4());

    let viewer_context = match auth_info.token {
        Some(token) => {
            let user = app_state
                .store
                .user_by_token(&token)
                .await?
                .ok_or_else(|| {
                    warn!(request_id = %request_id, "Rejected unknown API token");
                    AppError::Unauthorized("Invalid token.".to_string())
                })?;
            debug!(request_id = %request_id, user = %user.username, "Authenticated viewer");
            ViewerContext::authenticated_user(user, request_id)
        }
        None => ViewerContext::anonymous(request_id),
    };

    Ok(Arc::new(viewer_context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_auth_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer token123"));

        let auth_info = extract_auth_from_request(&headers).unwrap();
        assert_eq!(auth_info.token, Some("token123".to_string()));
        assert_eq!(auth_info.auth_method, Some("bearer".to_string()));
    }

    #[test]
    fn test_extract_auth_token_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Token abc"));

        let auth_info = extract_auth_from_request(&headers).unwrap();
        assert_eq!(auth_info.token, Some("abc".to_string()));
        assert_eq!(auth_info.auth_method, Some("token".to_string()));
    }

    #[test]
    fn test_extract_auth_rejects_unknown_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcjpwdw=="));

        let result = extract_auth_from_request(&headers);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_extract_auth_rejects_empty_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer   "));

        assert!(extract_auth_from_request(&headers).is_err());
    }

    #[test]
    fn test_extract_auth_anonymous() {
        let headers = HeaderMap::new();

        let auth_info = extract_auth_from_request(&headers).unwrap();
        assert_eq!(auth_info.token, None);
        assert_eq!(auth_info.auth_method, None);
    }
}
