// ViewerContext Extractor - hands the request's ViewerContext to handlers
// Cloning a Vc only clones the inner Arc.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use crate::error::AppError;
use crate::infrastructure::viewer::ViewerContext;
use crate::models::User;

/// Handler-facing wrapper around the request's `Arc<ViewerContext>`.
///
/// ```ignore
/// async fn handler(vc: Vc, Json(input): Json<TechnologyInput>) -> AppResult<Json<Value>> {
///     let editor = vc.require_privileged()?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Vc(Arc<ViewerContext>);

impl Vc {
    pub fn new(vc: Arc<ViewerContext>) -> Self {
        Self(vc)
    }

    pub fn arc(self) -> Arc<ViewerContext> {
        self.0
    }
}

impl std::ops::Deref for Vc {
    type Target = ViewerContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<ViewerContext> for Vc {
    fn as_ref(&self) -> &ViewerContext {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Vc
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let vc = parts
            .extensions
            .get::<Arc<ViewerContext>>()
            .map(|vc| Vc(vc.clone()))
            .ok_or_else(|| {
                AppError::Internal("viewer context middleware not installed".to_string())
            });

        async move { vc }
    }
}

/// The acting staff user. Extraction fails with 401 for anonymous and 403 for
/// non-staff viewers, before any request body is read.
#[derive(Debug, Clone)]
pub struct Staff(pub User);

impl<S> FromRequestParts<S> for Staff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let vc = Vc::from_request_parts(parts, state).await?;
        let user = vc.require_privileged()?.clone();
        Ok(Staff(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;

    fn user(is_staff: bool) -> User {
        User {
            id: 1,
            username: if is_staff { "admin" } else { "reader" }.to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff,
            created_at: Utc::now(),
        }
    }

    async fn extract_staff(vc: ViewerContext) -> Result<Staff, AppError> {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        parts.extensions.insert(Arc::new(vc));
        Staff::from_request_parts(&mut parts, &()).await
    }

    #[test]
    fn test_vc_deref() {
        let viewer_context = Arc::new(ViewerContext::anonymous("test-request".to_string()));
        let vc = Vc::new(viewer_context);

        assert_eq!(vc.request_id, "test-request");
        assert!(!vc.is_authenticated());

        let vc_arc = vc.arc();
        assert_eq!(vc_arc.request_id, "test-request");
    }

    #[tokio::test]
    async fn test_extract_without_middleware_fails() {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let result = Vc::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_extract_from_extensions() {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        parts
            .extensions
            .insert(Arc::new(ViewerContext::anonymous("req-9".to_string())));
        let vc = Vc::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(vc.request_id, "req-9");
    }

    #[tokio::test]
    async fn test_staff_extraction_by_viewer() {
        let anonymous = extract_staff(ViewerContext::anonymous("req-1".to_string())).await;
        assert!(matches!(anonymous, Err(AppError::Unauthorized(_))));

        let reader = extract_staff(ViewerContext::authenticated_user(user(false), "req-2".to_string())).await;
        assert!(matches!(reader, Err(AppError::Forbidden(_))));

        let Staff(admin) = extract_staff(ViewerContext::authenticated_user(user(true), "req-3".to_string()))
            .await
            .unwrap();
        assert_eq!(admin.username, "admin");
    }
}
