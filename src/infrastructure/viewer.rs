// Viewer Context - who is making the request
// Built once per request by the middleware and read by handlers through `Vc`.

use crate::error::{AppError, AppResult};
use crate::models::User;

#[derive(Debug, Clone, PartialEq)]
pub enum Viewer {
    Anonymous,
    User(User),
}

#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub request_id: String,
    pub viewer: Viewer,
}

impl ViewerContext {
    pub fn anonymous(request_id: String) -> Self {
        Self {
            request_id,
            viewer: Viewer::Anonymous,
        }
    }

    pub fn authenticated_user(user: User, request_id: String) -> Self {
        Self {
            request_id,
            viewer: Viewer::User(user),
        }
    }

    pub fn user(&self) -> Option<&User> {
        match &self.viewer {
            Viewer::User(user) => Some(user),
            Viewer::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Privileged viewers may create, update and delete content.
    pub fn is_privileged(&self) -> bool {
        self.user().map(|u| u.is_staff).unwrap_or(false)
    }

    /// The acting staff user, or 401 for anonymous / 403 for non-staff viewers.
    pub fn require_privileged(&self) -> AppResult<&User> {
        match &self.viewer {
            Viewer::Anonymous => Err(AppError::Unauthorized(
                "Authentication credentials were not provided.".to_string(),
            )),
            Viewer::User(user) if !user.is_staff => Err(AppError::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            )),
            Viewer::User(user) => Ok(user),
        }
    }
}
