//! SEO strategist: manual product copy analysis and live URL audits.

use super::{decode, encode, fetch_record, Identified, RecordList, SavedRecord, ToolContext};
use crate::api::Backend;
use crate::error::ClientError;
use crate::i18n::{Language, Message};
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const MANUAL_PATH: &str = "/tools/seo-strategist/manual";
const URL_PATH: &str = "/tools/seo-strategist/url";
pub const ANALYSES_PATH: &str = "/tools/seo-strategist/analyses";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualSeoRequest {
    pub product_name: String,
    pub product_description: String,
    /// Comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_keywords: Option<String>,
    #[serde(default)]
    pub language: Language,
}

impl ManualSeoRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.product_name.trim().is_empty() || self.product_description.trim().is_empty() {
            return Err(ClientError::Validation(Message::FieldRequired));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlSeoRequest {
    pub url: String,
    #[serde(default)]
    pub language: Language,
}

impl UrlSeoRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        match Url::parse(self.url.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => Ok(()),
            _ => Err(ClientError::Validation(Message::InvalidUrl)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualSeoResult {
    pub title: String,
    pub meta_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub seo_description: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub score: u8,
}

/// The URL audit sections are free-form objects whose keys vary by page type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlSeoResult {
    pub url: String,
    #[serde(default)]
    pub content_info: Map<String, Value>,
    #[serde(default)]
    pub product_analysis: Map<String, Value>,
    #[serde(default)]
    pub seo_optimization: Map<String, Value>,
    #[serde(default)]
    pub user_experience: Map<String, Value>,
    #[serde(default)]
    pub technical_seo: Map<String, Value>,
    #[serde(default)]
    pub competitive_analysis: Map<String, Value>,
    #[serde(default)]
    pub impact_analysis: Map<String, Value>,
    #[serde(default)]
    pub segment_scores: Map<String, Value>,
    #[serde(default)]
    pub action_items: Map<String, Value>,
    pub seo_score: u8,
}

/// A saved analysis. The backend stores both kinds in one table and tells
/// them apart with `analysis_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "analysis_type", rename_all = "lowercase")]
pub enum SeoAnalysis {
    Manual(SavedRecord<ManualSeoRequest, ManualSeoResult>),
    Url(SavedRecord<UrlSeoRequest, UrlSeoResult>),
}

impl SeoAnalysis {
    pub fn analysis_type(&self) -> &'static str {
        match self {
            SeoAnalysis::Manual(_) => "manual",
            SeoAnalysis::Url(_) => "url",
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            SeoAnalysis::Manual(record) => record.created_at,
            SeoAnalysis::Url(record) => record.created_at,
        }
    }

    pub fn score(&self) -> u8 {
        match self {
            SeoAnalysis::Manual(record) => record.response_data.score,
            SeoAnalysis::Url(record) => record.response_data.seo_score,
        }
    }

    /// Product name for manual runs, the audited URL otherwise.
    pub fn subject(&self) -> &str {
        match self {
            SeoAnalysis::Manual(record) => &record.request_data.product_name,
            SeoAnalysis::Url(record) => &record.request_data.url,
        }
    }
}

impl Identified for SeoAnalysis {
    fn id(&self) -> i64 {
        match self {
            SeoAnalysis::Manual(record) => record.id,
            SeoAnalysis::Url(record) => record.id,
        }
    }
}

pub async fn analyze_manual(
    backend: &dyn Backend,
    ctx: &ToolContext,
    request: &ManualSeoRequest,
) -> Result<ManualSeoResult, ClientError> {
    let request = ManualSeoRequest {
        language: ctx.language,
        ..request.clone()
    };
    request.validate()?;

    let value = backend
        .tool_post(&ctx.token, MANUAL_PATH, &ctx.workspace_slug, encode(&request)?)
        .await?;
    decode(value)
}

pub async fn analyze_url(
    backend: &dyn Backend,
    ctx: &ToolContext,
    request: &UrlSeoRequest,
) -> Result<UrlSeoResult, ClientError> {
    let request = UrlSeoRequest {
        url: request.url.trim().to_string(),
        language: ctx.language,
    };
    request.validate()?;

    let value = backend
        .tool_post(&ctx.token, URL_PATH, &ctx.workspace_slug, encode(&request)?)
        .await?;
    decode(value)
}

pub fn analyses() -> RecordList<SeoAnalysis> {
    RecordList::new(ANALYSES_PATH)
}

pub async fn get_analysis(backend: &dyn Backend, ctx: &ToolContext, id: i64) -> Result<SeoAnalysis, ClientError> {
    fetch_record(backend, ctx, ANALYSES_PATH, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use crate::tools::test_context;
    use serde_json::json;

    fn manual_result() -> Value {
        json!({
            "title": "Portable Blender | USB-C",
            "meta_description": "Blend anywhere.",
            "keywords": ["blender", "portable"],
            "seo_description": "A compact blender.",
            "recommendations": ["Add reviews"],
            "score": 72
        })
    }

    fn url_result() -> Value {
        json!({
            "url": "https://shop.example.com/p/1",
            "content_info": {"title": "Blender"},
            "product_analysis": {},
            "seo_optimization": {},
            "user_experience": {},
            "technical_seo": {"https": true},
            "competitive_analysis": {},
            "impact_analysis": {},
            "segment_scores": {"content": 60},
            "action_items": {"high": ["Fix title"]},
            "seo_score": 58
        })
    }

    #[tokio::test]
    async fn test_manual_requires_name_and_description() {
        let backend = FakeBackend::new();
        let err = analyze_manual(
            &backend,
            &test_context(),
            &ManualSeoRequest {
                product_name: "Blender".to_string(),
                product_description: "   ".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Validation(Message::FieldRequired)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_manual_posts_with_ui_language() {
        let backend = FakeBackend::new().with_tool_data(MANUAL_PATH, manual_result());
        let mut ctx = test_context();
        ctx.language = Language::Tr;

        let result = analyze_manual(
            &backend,
            &ctx,
            &ManualSeoRequest {
                product_name: "Blender".to_string(),
                product_description: "Compact".to_string(),
                target_keywords: Some("blender, smoothie".to_string()),
                language: Language::En,
            },
        )
        .await
        .unwrap();

        assert_eq!(result.score, 72);
        let body = backend.last_body(MANUAL_PATH).unwrap();
        assert_eq!(body["language"], "tr");
        assert_eq!(body["target_keywords"], "blender, smoothie");
    }

    #[test]
    fn test_url_validation() {
        let valid = |url: &str| {
            UrlSeoRequest {
                url: url.to_string(),
                language: Language::En,
            }
            .validate()
            .is_ok()
        };
        assert!(valid("https://shop.example.com/p/1"));
        assert!(valid("http://localhost:3000"));
        assert!(!valid("ftp://example.com"));
        assert!(!valid("shop.example.com"));
        assert!(!valid(""));
    }

    #[tokio::test]
    async fn test_analyze_url_decodes_sections() {
        let backend = FakeBackend::new().with_tool_data(URL_PATH, url_result());

        let result = analyze_url(
            &backend,
            &test_context(),
            &UrlSeoRequest {
                url: " https://shop.example.com/p/1 ".to_string(),
                language: Language::En,
            },
        )
        .await
        .unwrap();

        assert_eq!(result.seo_score, 58);
        assert_eq!(result.segment_scores["content"], 60);
        assert_eq!(backend.last_body(URL_PATH).unwrap()["url"], "https://shop.example.com/p/1");
    }

    #[tokio::test]
    async fn test_history_is_discriminated_by_analysis_type() {
        let backend = FakeBackend::new().with_tool_data(
            ANALYSES_PATH,
            json!([
                {
                    "id": 1, "workspace_id": 5, "user_id": 1, "analysis_type": "manual",
                    "request_data": {"product_name": "Blender", "product_description": "Compact", "language": "en"},
                    "response_data": manual_result(),
                    "created_at": "2025-05-01T12:00:00"
                },
                {
                    "id": 2, "workspace_id": 5, "user_id": 1, "analysis_type": "url",
                    "request_data": {"url": "https://shop.example.com/p/1", "language": "tr"},
                    "response_data": url_result(),
                    "created_at": "2025-05-02T08:30:00Z"
                },
                {
                    "id": 3, "workspace_id": 5, "user_id": 1, "analysis_type": "bulk",
                    "request_data": {}, "response_data": {},
                    "created_at": "2025-05-03T08:30:00Z"
                }
            ]),
        );
        let mut list = analyses();

        let items = list.reload(&backend, &test_context()).await.unwrap();

        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], SeoAnalysis::Manual(_)));
        assert_eq!(items[0].subject(), "Blender");
        assert_eq!(items[1].analysis_type(), "url");
        assert_eq!(items[1].score(), 58);
    }
}
