//! Trend agent: product ideas for a category/market, with saved suggestions.

use super::{decode, encode, fetch_record, RecordList, SavedRecord, ToolContext};
use crate::api::{fields, Backend};
use crate::error::ClientError;
use crate::i18n::{Language, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SUGGEST_PATH: &str = "/tools/trend-agent/suggest";
pub const SUGGESTIONS_PATH: &str = "/tools/trend-agent/suggestions";

pub const MIN_PRODUCT_COUNT: u8 = 1;
pub const MAX_PRODUCT_COUNT: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub target_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
    pub include_trends: bool,
    pub product_count: u8,
    pub language: Language,
}

impl Default for TrendRequest {
    fn default() -> Self {
        Self {
            category: None,
            target_country: "TR".to_string(),
            budget_range: None,
            target_audience: None,
            additional_notes: None,
            include_trends: true,
            product_count: 3,
            language: Language::default(),
        }
    }
}

impl TrendRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        if !(MIN_PRODUCT_COUNT..=MAX_PRODUCT_COUNT).contains(&self.product_count) {
            return Err(ClientError::Validation(Message::InvalidProductCount));
        }
        if self.target_country.trim().is_empty() {
            return Err(ClientError::Validation(Message::FieldRequired));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub product_idea: String,
    pub description: String,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub recommended_price_range: Option<String>,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub target_audience: Option<String>,
    pub competition_score: u8,
    pub trend_score: u8,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub profit_margin_estimate: Option<String>,
    #[serde(default)]
    pub market_opportunity: String,
    #[serde(default)]
    pub risks_and_challenges: String,
    #[serde(default)]
    pub marketing_suggestions: String,
    #[serde(default)]
    pub ecommerce_platforms: Vec<String>,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub estimated_demand: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTrendsData {
    pub keyword: String,
    pub trend_score: u8,
    #[serde(default)]
    pub interest_over_time: Vec<serde_json::Value>,
    #[serde(default)]
    pub related_queries: Vec<serde_json::Value>,
    #[serde(default)]
    pub related_topics: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "fields::known_string")]
    pub chart_data: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendAnalysis {
    pub category_analysis: String,
    pub market_trends: String,
    pub seasonal_factors: String,
    pub competitive_landscape: String,
    pub ai_recommendations: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResponse {
    pub products: Vec<ProductSuggestion>,
    #[serde(default)]
    pub trends_data: Option<GoogleTrendsData>,
    #[serde(default)]
    pub trend_analysis: TrendAnalysis,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default, deserialize_with = "fields::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

pub type TrendSuggestion = SavedRecord<TrendRequest, TrendResponse>;

/// Runs the agent. The request's language is overridden by the UI language.
pub async fn suggest(
    backend: &dyn Backend,
    ctx: &ToolContext,
    request: &TrendRequest,
) -> Result<TrendResponse, ClientError> {
    let mut request = request.clone();
    request.language = ctx.language;
    request.validate()?;

    let body = encode(&request)?;
    let value = backend
        .tool_post(&ctx.token, SUGGEST_PATH, &ctx.workspace_slug, body)
        .await?;
    decode(value)
}

pub fn suggestions() -> RecordList<TrendSuggestion> {
    RecordList::new(SUGGESTIONS_PATH)
}

pub async fn get_suggestion(
    backend: &dyn Backend,
    ctx: &ToolContext,
    id: i64,
) -> Result<TrendSuggestion, ClientError> {
    fetch_record(backend, ctx, SUGGESTIONS_PATH, id).await
}
