//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::booking::Booking;
use super::property::{Property, StoredImage};
use super::purchase::Purchase;
use super::review::Review;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Stored lower-cased; unique across all users.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    /// Image-host handle of an uploaded avatar.
    #[serde(skip_serializing)]
    pub avatar_handle: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    /// Raw password (will be hashed with Argon2id before storage).
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    /// `Some(Some(image))` = set, `Some(None)` = clear, `None` = no change.
    #[serde(default, deserialize_with = "present")]
    pub avatar: Option<Option<StoredImage>>,
}

/// Keeps an explicit `null` apart from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A user together with everything that references them, assembled
/// from queries rather than stored arrays.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user: User,
    pub listings: Vec<Property>,
    pub bookings: Vec<Booking>,
    pub reviews: Vec<Review>,
    pub purchases: Vec<Purchase>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_avatar_clears_and_missing_avatar_keeps() {
        let cleared: UpdateUser = serde_json::from_str(r#"{"avatar": null}"#).unwrap();
        assert_eq!(cleared.avatar, Some(None));

        let untouched: UpdateUser = serde_json::from_str(r#"{"name": "Ana"}"#).unwrap();
        assert_eq!(untouched.avatar, None);

        let set: UpdateUser =
            serde_json::from_str(r#"{"avatar": {"url": "/images/a.png", "handle": "a.png"}}"#)
                .unwrap();
        assert_eq!(set.avatar.unwrap().unwrap().handle, "a.png");
    }

    #[test]
    fn avatar_handle_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: "hash".into(),
            role: Role::User,
            avatar_url: Some("/images/a.png".into()),
            avatar_handle: Some("a.png".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["avatar_url"], "/images/a.png");
        assert!(json.get("avatar_handle").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
