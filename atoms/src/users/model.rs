use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a record with a fresh v4 id, stamped with the current time.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }

    /// Applies the non-empty fields of `patch`. Empty strings leave the field as is.
    pub fn apply(&mut self, patch: &UpdateUserPayload) {
        if let Some(name) = patch.name.as_deref().filter(|n| !n.is_empty()) {
            self.name = name.to_string();
        }
        if let Some(email) = patch.email.as_deref().filter(|e| !e.is_empty()) {
            self.email = email.to_string();
        }
    }
}

/// Body of `POST /api/v1/users`. Any `id` or `created_at` sent by the client is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
}
