//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tr4cking_core::types::{PersonId, UserId};

use super::role::UserRole;
use super::status::UserStatus;

/// A back-office account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name (case-insensitive).
    pub username: String,
    /// Email address (optional, unique when present).
    pub email: Option<String>,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// User role (RBAC).
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// Consecutive failed login attempts.
    pub failed_login_attempts: i32,
    /// Account locked until this time (if locked).
    pub locked_until: Option<DateTime<Utc>>,
    /// Linked person record, if the account belongs to a known person.
    pub person_id: Option<PersonId>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the lockout window is still running at `now`.
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        match self.locked_until {
            Some(until) => now < until,
            None => self.status == UserStatus::Locked,
        }
    }

    /// Whether the account may authenticate at `now`.
    pub fn can_login_at(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            UserStatus::Inactive => false,
            UserStatus::Active | UserStatus::Locked => !self.is_locked_at(now),
        }
    }

    /// Full name for display, falling back to the username.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone(),
        }
    }
}

/// Data required to insert a user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Assigned role.
    pub role: UserRole,
    /// Linked person.
    pub person_id: Option<PersonId>,
}

/// Full replacement of a user's editable profile.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    /// Email address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Role.
    pub role: UserRole,
    /// Status.
    pub status: UserStatus,
    /// Linked person.
    pub person_id: Option<PersonId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(status: UserStatus, locked_until: Option<DateTime<Utc>>) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(1),
            username: "caja1".to_string(),
            email: None,
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            role: UserRole::Clerk,
            status,
            failed_login_attempts: 0,
            locked_until,
            person_id: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[test]
    fn test_lockout_expires() {
        let now = Utc::now();
        let locked = user(UserStatus::Locked, Some(now + Duration::minutes(5)));
        assert!(!locked.can_login_at(now));
        assert!(locked.can_login_at(now + Duration::minutes(6)));
    }

    #[test]
    fn test_inactive_never_logs_in() {
        let now = Utc::now();
        assert!(!user(UserStatus::Inactive, None).can_login_at(now));
        assert!(user(UserStatus::Active, None).can_login_at(now));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut u = user(UserStatus::Active, None);
        u.password_hash = "$argon2id$secret".to_string();
        let json = serde_json::to_value(&u).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(u.display_name(), "caja1");
    }
}
