//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tr4cking_core::types::UserId;
use tr4cking_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the API from the bearer token and passed into service methods
/// so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's role at the time the JWT was issued.
    pub role: UserRole,
    /// The username (convenience field from JWT claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(user_id: UserId, role: UserRole, username: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            username: username.into(),
            request_time: Utc::now(),
        }
    }

    /// Context for administrative tooling running outside an HTTP request.
    pub fn system() -> Self {
        Self::new(UserId::new(0), UserRole::Admin, "system")
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
