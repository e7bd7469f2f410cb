use super::{
    AuthToken, Backend, Credentials, PasswordChange, ProfileUpdate, Registration, User, Workspace,
    WorkspaceInput,
};
use crate::i18n::Language;
use async_trait::async_trait;
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestError(String),
    #[error("{detail}")]
    ApiError { status: u16, detail: String },
    #[error("Unauthorized")]
    Unauthorized { detail: Option<String> },
    #[error("Invalid response: {0}")]
    DecodeError(String),
}

impl ApiError {
    /// Human-readable message sent by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::ApiError { detail, .. } => Some(detail),
            ApiError::Unauthorized { detail } => detail.as_deref(),
            ApiError::RequestError(_) | ApiError::DecodeError(_) => None,
        }
    }
}

/// HTTP implementation of [`Backend`].
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    language: RwLock<Language>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            language: RwLock::new(Language::default()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let language = *self.language.read().unwrap_or_else(|e| e.into_inner());
        self.http
            .request(method, self.url(path))
            .header(ACCEPT_LANGUAGE, language.code())
    }

    fn authorized(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(token)
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::RequestError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = parse_error_detail(&body);
        log::debug!("Backend returned {}: {:?}", status, detail);

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized { detail });
        }

        Err(ApiError::ApiError {
            status: status.as_u16(),
            detail: detail.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            }),
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        Self::send(builder)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::DecodeError(e.to_string()))
    }
}

/// Pulls the message out of a FastAPI error body.
///
/// `detail` is either a string or, for request validation errors, a list of
/// `{loc, msg, type}` objects whose messages are joined.
pub fn parse_error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[async_trait]
impl Backend for ApiClient {
    fn set_language(&self, language: Language) {
        *self.language.write().unwrap_or_else(|e| e.into_inner()) = language;
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ApiError> {
        Self::send_json(self.request(Method::POST, "/auth/login").json(credentials)).await
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        Self::send_json(self.request(Method::POST, "/auth/register").json(registration)).await
    }

    async fn me(&self, token: &str) -> Result<User, ApiError> {
        Self::send_json(self.authorized(Method::GET, "/auth/me", token)).await
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        Self::send_json(self.authorized(Method::PUT, "/auth/profile", token).json(update)).await
    }

    async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<(), ApiError> {
        Self::send(self.authorized(Method::PUT, "/auth/change-password", token).json(change)).await?;
        Ok(())
    }

    async fn list_workspaces(&self, token: &str) -> Result<Vec<Workspace>, ApiError> {
        Self::send_json(self.authorized(Method::GET, "/api/workspaces/", token)).await
    }

    async fn create_workspace(&self, token: &str, input: &WorkspaceInput) -> Result<Workspace, ApiError> {
        Self::send_json(self.authorized(Method::POST, "/api/workspaces/", token).json(input)).await
    }

    async fn update_workspace(
        &self,
        token: &str,
        slug: &str,
        input: &WorkspaceInput,
    ) -> Result<Workspace, ApiError> {
        let path = format!("/api/workspaces/{}", slug);
        Self::send_json(self.authorized(Method::PUT, &path, token).json(input)).await
    }

    async fn delete_workspace(&self, token: &str, slug: &str) -> Result<(), ApiError> {
        let path = format!("/api/workspaces/{}", slug);
        Self::send(self.authorized(Method::DELETE, &path, token)).await?;
        Ok(())
    }

    async fn tool_get(
        &self,
        token: &str,
        path: &str,
        workspace_slug: &str,
    ) -> Result<serde_json::Value, ApiError> {
        Self::send_json(
            self.authorized(Method::GET, path, token)
                .query(&[("workspace_slug", workspace_slug)]),
        )
        .await
    }

    async fn tool_post(
        &self,
        token: &str,
        path: &str,
        workspace_slug: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        Self::send_json(
            self.authorized(Method::POST, path, token)
                .query(&[("workspace_slug", workspace_slug)])
                .json(&body),
        )
        .await
    }

    async fn tool_delete(&self, token: &str, path: &str, workspace_slug: &str) -> Result<(), ApiError> {
        Self::send(
            self.authorized(Method::DELETE, path, token)
                .query(&[("workspace_slug", workspace_slug)]),
        )
        .await?;
        Ok(())
    }
}
