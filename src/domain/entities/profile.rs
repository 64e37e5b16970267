//! The signed-in user's profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::serde_utils;

/// Profile as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(with = "serde_utils::naive_utc")]
    pub created_at: DateTime<Utc>,
}

const fn default_active() -> bool {
    true
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl UserProfile {
    /// Full name when set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_blank(self.full_name.as_ref()).unwrap_or(&self.username)
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_ref())
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        non_blank(self.location.as_ref())
    }

    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        non_blank(self.bio.as_ref())
    }

    /// Applies a successful update locally.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(full_name) = &update.full_name {
            self.full_name = Some(full_name.clone());
        }
        if let Some(email) = &update.email {
            self.email = Some(email.clone());
        }
        if let Some(bio) = &update.bio {
            self.bio = Some(bio.clone());
        }
        if let Some(location) = &update.location {
            self.location = Some(location.clone());
        }
    }
}

/// Body of `PUT /users/me`. Absent fields are left unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ProfileUpdate {
    /// Builds an update holding only the fields that differ from `current`.
    ///
    /// Values are trimmed. A blank email is never sent, since the backend
    /// would store it as an address.
    #[must_use]
    pub fn changes_from(
        current: &UserProfile,
        full_name: &str,
        email: &str,
        bio: &str,
        location: &str,
    ) -> Self {
        fn changed(old: Option<&String>, new: &str) -> Option<String> {
            let new = new.trim();
            (old.map_or("", |s| s.trim()) != new).then(|| new.to_string())
        }

        Self {
            full_name: changed(current.full_name.as_ref(), full_name),
            email: changed(current.email.as_ref(), email).filter(|e| !e.is_empty()),
            bio: changed(current.bio.as_ref(), bio),
            location: changed(current.location.as_ref(), location),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.location.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        serde_json::from_str(
            r#"{
                "id": 7, "username": "meera", "email": "meera@example.org",
                "full_name": null, "bio": "Runner", "location": null,
                "is_active": true, "created_at": "2024-03-01T10:00:00"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut user = profile();
        assert_eq!(user.display_name(), "meera");

        user.full_name = Some("  ".to_string());
        assert_eq!(user.display_name(), "meera");

        user.full_name = Some("Meera Rao".to_string());
        assert_eq!(user.display_name(), "Meera Rao");
        assert_eq!(user.location(), None);
        assert_eq!(user.bio(), Some("Runner"));
    }

    #[test]
    fn test_changes_only_include_edited_fields() {
        let user = profile();

        let update =
            ProfileUpdate::changes_from(&user, "Meera Rao ", "meera@example.org", "Runner", "");

        assert_eq!(update.full_name.as_deref(), Some("Meera Rao"));
        assert!(update.email.is_none());
        assert!(update.bio.is_none());
        assert!(update.location.is_none());

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_blank_email_never_sent_but_bio_can_be_cleared() {
        let user = profile();

        let update = ProfileUpdate::changes_from(&user, "", "", "", "");

        assert!(update.email.is_none());
        assert_eq!(update.bio.as_deref(), Some(""));
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_apply_merges_update() {
        let mut user = profile();
        user.apply(&ProfileUpdate {
            location: Some("Pune".to_string()),
            ..ProfileUpdate::default()
        });

        assert_eq!(user.location(), Some("Pune"));
        assert_eq!(user.bio(), Some("Runner"));
    }
}
