//! Typed access to the three AI tools. Every call is bearer-authenticated and
//! scoped to one workspace through [`ToolContext`].

pub mod adcreative;
pub mod seo;
pub mod trend;

use crate::api::{fields, ApiError, Backend};
use crate::error::ClientError;
use crate::i18n::Language;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Who is asking and for which workspace.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub token: String,
    pub workspace_slug: String,
    pub language: Language,
}

/// A saved tool run as returned by the history endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRecord<Req, Resp> {
    pub id: i64,
    pub workspace_id: i64,
    pub user_id: i64,
    pub request_data: Req,
    pub response_data: Resp,
    #[serde(deserialize_with = "fields::timestamp")]
    pub created_at: DateTime<Utc>,
}

pub trait Identified {
    fn id(&self) -> i64;
}

impl<Req, Resp> Identified for SavedRecord<Req, Resp> {
    fn id(&self) -> i64 {
        self.id
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ApiError::DecodeError(e.to_string()).into())
}

pub(crate) fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ApiError::DecodeError(e.to_string()).into())
}

/// Decodes a history list. Records that do not decode are skipped so one bad
/// row does not hide the rest.
pub(crate) fn decode_records<T: DeserializeOwned>(value: serde_json::Value) -> Result<Vec<T>, ClientError> {
    let serde_json::Value::Array(items) = value else {
        return Err(ApiError::DecodeError("expected a list of records".to_string()).into());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping unreadable history record: {}", e);
                None
            }
        })
        .collect())
}

/// A workspace's saved records for one tool.
///
/// Always reflects the last successful fetch: deleting goes to the backend and
/// then refetches instead of removing locally.
pub struct RecordList<T> {
    path: &'static str,
    items: Vec<T>,
}

impl<T: DeserializeOwned + Identified> RecordList<T> {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            items: Vec::new(),
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// On failure the previous items are kept.
    pub async fn reload(&mut self, backend: &dyn Backend, ctx: &ToolContext) -> Result<&[T], ClientError> {
        match backend.tool_get(&ctx.token, self.path, &ctx.workspace_slug).await {
            Ok(value) => {
                self.items = decode_records(value)?;
                Ok(&self.items)
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", self.path, e);
                Err(e.into())
            }
        }
    }

    pub async fn delete(&mut self, backend: &dyn Backend, ctx: &ToolContext, id: i64) -> Result<(), ClientError> {
        let path = format!("{}/{}", self.path, id);
        backend.tool_delete(&ctx.token, &path, &ctx.workspace_slug).await?;
        log::info!("Deleted {}", path);

        match self.reload(backend, ctx).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_unauthorized() => Err(e),
            Err(e) => {
                log::warn!("List not refreshed after delete: {}", e);
                Ok(())
            }
        }
    }
}

pub(crate) async fn fetch_record<T: DeserializeOwned>(
    backend: &dyn Backend,
    ctx: &ToolContext,
    collection: &str,
    id: i64,
) -> Result<T, ClientError> {
    let path = format!("{}/{}", collection, id);
    decode(backend.tool_get(&ctx.token, &path, &ctx.workspace_slug).await?)
}

#[cfg(test)]
pub(crate) fn test_context() -> ToolContext {
    ToolContext {
        token: crate::testing::TOKEN.to_string(),
        workspace_slug: "a".to_string(),
        language: Language::En,
    }
}
