//! Ad creative generator.

use super::{decode, encode, fetch_record, RecordList, SavedRecord, ToolContext};
use crate::api::Backend;
use crate::error::ClientError;
use crate::i18n::{Language, Message};
use serde::{Deserialize, Serialize};

const GENERATE_PATH: &str = "/tools/adcreative/";
pub const ANALYSES_PATH: &str = "/tools/adcreative/analyses";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audience {
    /// Age range such as `20-30`.
    pub age: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdCreativeRequest {
    #[serde(default)]
    pub lang: Language,
    pub product_name: String,
    pub product_description: String,
    /// Instagram, TikTok, Meta or Google Ads.
    pub platform: String,
    /// Sales, Traffic or Awareness.
    pub goal: String,
    #[serde(default)]
    pub audience: Audience,
}

impl AdCreativeRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        let required = [
            &self.product_name,
            &self.product_description,
            &self.platform,
            &self.goal,
            &self.audience.age,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(ClientError::Validation(Message::FieldRequired));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headlines {
    pub short: String,
    pub long: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub trend_level: String,
    pub search_volume: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Performance {
    pub ctr_estimate: String,
    pub ad_score: u8,
    pub conversion_potential: String,
    pub estimated_reach: String,
    pub cost_per_click: String,
    pub roas_potential: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRecommendations {
    pub daily_budget: String,
    pub campaign_duration: String,
    pub budget_allocation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdCreativeResult {
    pub headlines: Headlines,
    #[serde(default)]
    pub ad_texts: Vec<String>,
    #[serde(default)]
    pub ctas: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    pub performance: Performance,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub platform_tips: Vec<String>,
    #[serde(default)]
    pub ab_testing: Vec<String>,
    pub budget_recommendations: BudgetRecommendations,
    #[serde(default)]
    pub campaign_timeline: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub image_url: String,
}

pub type AdCreativeAnalysis = SavedRecord<AdCreativeRequest, AdCreativeResult>;

pub async fn generate(
    backend: &dyn Backend,
    ctx: &ToolContext,
    request: &AdCreativeRequest,
) -> Result<AdCreativeResult, ClientError> {
    let request = AdCreativeRequest {
        lang: ctx.language,
        ..request.clone()
    };
    request.validate()?;

    let value = backend
        .tool_post(&ctx.token, GENERATE_PATH, &ctx.workspace_slug, encode(&request)?)
        .await?;
    decode(value)
}

pub fn analyses() -> RecordList<AdCreativeAnalysis> {
    RecordList::new(ANALYSES_PATH)
}

pub async fn get_analysis(
    backend: &dyn Backend,
    ctx: &ToolContext,
    id: i64,
) -> Result<AdCreativeAnalysis, ClientError> {
    fetch_record(backend, ctx, ANALYSES_PATH, id).await
}

#[cfg(test)]
pub(crate) fn sample_result() -> serde_json::Value {
    serde_json::json!({
        "headlines": {"short": "Blend anywhere", "long": "The blender that fits in your bag"},
        "ad_texts": ["Smoothies on the go."],
        "ctas": ["Shop now"],
        "keywords": [{"keyword": "#smoothie", "trend_level": "🔥", "search_volume": "High"}],
        "performance": {
            "ctr_estimate": "2.1%", "ad_score": 81, "conversion_potential": "High",
            "estimated_reach": "10K-50K", "cost_per_click": "₺1.20", "roas_potential": "3x"
        },
        "insights": ["Lead with portability"],
        "platform_tips": ["Use Reels"],
        "ab_testing": ["Test two headlines"],
        "budget_recommendations": {
            "daily_budget": "₺300", "campaign_duration": "14 days", "budget_allocation": "70/30"
        },
        "campaign_timeline": ["Week 1: launch"],
        "next_steps": ["Upload creative"],
        "image_url": "https://cdn.example.com/ad.png"
    })
}
