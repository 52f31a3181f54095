//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::geo::GeoPoint;

/// Registered user. Password handling lives in the crypto layer; the domain
/// only ever sees the hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub location: GeoPoint,
    pub avatar: Option<String>,
    pub notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whitelisted profile fields a user may change about themselves
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<GeoPoint>,
    pub avatar: Option<String>,
    pub notifications: Option<bool>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            phone_number: phone_number.into(),
            location: GeoPoint::new(0.0, 0.0),
            avatar: None,
            notifications: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a profile update. Email and password are deliberately not
    /// updatable through this path.
    pub fn apply_profile_update(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone_number {
            self.phone_number = phone;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        self.updated_at = Utc::now();
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_defaults() {
        let u = User::new("Alice", "alice@example.com", "hash", "+1 555 0100");
        assert!(u.notifications);
        assert!(u.avatar.is_none());
        assert_eq!(u.location, GeoPoint::new(0.0, 0.0));
    }

    #[test]
    fn profile_update_leaves_email_and_hash_alone() {
        let mut u = User::new("Alice", "alice@example.com", "hash", "+1 555 0100");
        u.apply_profile_update(ProfileUpdate {
            name: Some("Alicia".to_string()),
            avatar: Some("https://cdn.example.com/a.png".to_string()),
            ..Default::default()
        });
        assert_eq!(u.name, "Alicia");
        assert_eq!(u.email, "alice@example.com");
        assert_eq!(u.password_hash, "hash");
        assert_eq!(u.avatar.as_deref(), Some("https://cdn.example.com/a.png"));
    }
}
