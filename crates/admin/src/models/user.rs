//! Customer and administrator accounts.

use serde::{Deserialize, Serialize};
use shopdesk_core::{Email, UserId, UserRole};

use super::{Entity, empty_string_as_none, non_blank};
use crate::error::ValidationError;

/// A store account as listed by the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub role: UserRole,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Body of `PUT /admin/users/:id`.
///
/// The backend treats empty strings as "leave unchanged", so absent optional
/// fields are sent as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    pub full_name: String,
    pub role: UserRole,
    pub address: String,
    pub avatar_url: String,
}

impl UserUpdate {
    /// Build an update, trimming text fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required` if the full name is blank.
    pub fn new(
        full_name: &str,
        role: UserRole,
        address: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let full_name =
            non_blank(Some(full_name)).ok_or(ValidationError::Required("Full name"))?;
        Ok(Self {
            full_name,
            role,
            address: non_blank(address).unwrap_or_default(),
            avatar_url: non_blank(avatar_url).unwrap_or_default(),
        })
    }

    /// Update that keeps every field of `user` except those overridden.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            role: user.role,
            address: user.address.clone().unwrap_or_default(),
            avatar_url: user.avatar_url.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_backend_user() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "full_name": "Asha Rao",
            "email": "asha@shop.test",
            "role": "user",
            "is_blocked": true,
            "avatar_url": "",
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.id(), UserId::new(3));
        assert!(user.is_blocked);
        assert!(user.avatar_url.is_none());
        assert!(user.address.is_none());
    }

    #[test]
    fn test_update_requires_full_name() {
        assert_eq!(
            UserUpdate::new("  ", UserRole::User, None, None),
            Err(ValidationError::Required("Full name"))
        );
    }

    #[test]
    fn test_update_sends_empty_strings_for_absent_fields() {
        let update = UserUpdate::new(" Asha ", UserRole::Admin, Some(" "), None).unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"full_name": "Asha", "role": "admin", "address": "", "avatar_url": ""})
        );
    }
}
