pub mod client;
pub mod fields;

pub use client::{ApiClient, ApiError};

use crate::i18n::Language;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
}

/// Identity returned by `/auth/me`. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub website_url: Option<String>,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub store_platform: Option<String>,
    #[serde(deserialize_with = "fields::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub store_url: Option<String>,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub store_platform: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub user_role: Option<String>,
}

/// Body for workspace create and update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkspaceInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_platform: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_platform: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// The remote Gipoly backend.
///
/// Every method except `login` and `register` is bearer-authenticated and
/// takes the token explicitly. Tool endpoints are exchanged as raw JSON and
/// typed by the `tools` module.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Language sent as `Accept-Language` on subsequent requests.
    fn set_language(&self, _language: Language) {}

    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ApiError>;
    async fn register(&self, registration: &Registration) -> Result<User, ApiError>;
    async fn me(&self, token: &str) -> Result<User, ApiError>;
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, ApiError>;
    async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<(), ApiError>;

    async fn list_workspaces(&self, token: &str) -> Result<Vec<Workspace>, ApiError>;
    async fn create_workspace(&self, token: &str, input: &WorkspaceInput) -> Result<Workspace, ApiError>;
    async fn update_workspace(
        &self,
        token: &str,
        slug: &str,
        input: &WorkspaceInput,
    ) -> Result<Workspace, ApiError>;
    async fn delete_workspace(&self, token: &str, slug: &str) -> Result<(), ApiError>;

    async fn tool_get(
        &self,
        token: &str,
        path: &str,
        workspace_slug: &str,
    ) -> Result<serde_json::Value, ApiError>;
    async fn tool_post(
        &self,
        token: &str,
        path: &str,
        workspace_slug: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError>;
    async fn tool_delete(&self, token: &str, path: &str, workspace_slug: &str) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_decodes_backend_shape() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "email": "a@b.co", "full_name": "Ada", "website_url": null,
                "store_platform": "Unknown", "created_at": "2025-01-02T03:04:05.000001"}"#,
        )
        .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.display_name(), "Ada");
        assert_eq!(user.website_url, None);
        assert_eq!(user.store_platform, None);
    }

    #[test]
    fn test_workspace_decodes_list_entry_with_role() {
        let ws: Workspace = serde_json::from_str(
            r#"{"id": 5, "name": "Shop", "slug": "shop", "store_url": "",
                "store_platform": "shopify", "created_at": "2025-01-02T03:04:05",
                "owner_id": 1, "user_role": "owner"}"#,
        )
        .unwrap();

        assert_eq!(ws.store_url, None);
        assert_eq!(ws.store_platform.as_deref(), Some("shopify"));
        assert_eq!(ws.user_role.as_deref(), Some("owner"));
        assert!(ws.created_at.is_some());
    }

    #[test]
    fn test_workspace_snapshot_survives_reserialization() {
        let ws: Workspace = serde_json::from_str(
            r#"{"id": 5, "name": "Shop", "slug": "shop", "created_at": "2025-01-02T03:04:05"}"#,
        )
        .unwrap();

        let raw = serde_json::to_string(&ws).unwrap();
        let back: Workspace = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, ws);
    }

    #[test]
    fn test_workspace_input_omits_unset_fields() {
        let input = WorkspaceInput {
            name: Some("Shop".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&input).unwrap(), serde_json::json!({"name": "Shop"}));
    }
}
