use super::{local_time, print_json, print_list};
use crate::cli::{AdCommand, OutputFormat};
use crate::state::AppState;
use crate::tools::adcreative::{self, AdCreativeRequest, AdCreativeResult, Audience};

pub async fn run(state: &mut AppState, command: AdCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        AdCommand::Generate {
            name,
            description,
            platform,
            goal,
            age,
            interests,
        } => {
            let request = AdCreativeRequest {
                product_name: name,
                product_description: description,
                platform,
                goal,
                audience: Audience { age, interests },
                ..Default::default()
            };
            let result = state
                .run_tool(|backend, ctx| async move { adcreative::generate(backend.as_ref(), &ctx, &request).await })
                .await?;
            print_result(&result, format)
        }
        AdCommand::History => {
            let mut history = adcreative::analyses();
            state.reload_records(&mut history).await?;
            if format == OutputFormat::Json {
                return print_json(&history.items());
            }
            if history.items().is_empty() {
                println!("No saved ad creatives");
            }
            for record in history.items() {
                println!(
                    "{:>6}  {}  {:<12} {:<10} {}",
                    record.id,
                    local_time(&record.created_at),
                    record.request_data.platform,
                    record.request_data.goal,
                    record.request_data.product_name
                );
            }
            Ok(())
        }
        AdCommand::Show { id } => {
            let record = state
                .run_tool(|backend, ctx| async move { adcreative::get_analysis(backend.as_ref(), &ctx, id).await })
                .await?;
            if format == OutputFormat::Json {
                return print_json(&record);
            }
            print_result(&record.response_data, format)
        }
        AdCommand::Delete { id } => {
            let mut history = adcreative::analyses();
            state.delete_record(&mut history, id).await?;
            Ok(())
        }
    }
}

fn print_result(result: &AdCreativeResult, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(result);
    }
    println!("{}", result.headlines.short);
    println!("{}", result.headlines.long);
    println!(
        "Ad score {}/100, CTR {}, CPC {}, reach {}",
        result.performance.ad_score,
        result.performance.ctr_estimate,
        result.performance.cost_per_click,
        result.performance.estimated_reach
    );
    print_list("Ad texts", &result.ad_texts);
    print_list("Calls to action", &result.ctas);
    let keywords: Vec<String> = result
        .keywords
        .iter()
        .map(|k| format!("{} {} ({})", k.trend_level, k.keyword, k.search_volume))
        .collect();
    print_list("Keywords", &keywords);
    print_list("Insights", &result.insights);
    println!(
        "Budget: {} for {} ({})",
        result.budget_recommendations.daily_budget,
        result.budget_recommendations.campaign_duration,
        result.budget_recommendations.budget_allocation
    );
    if !result.image_url.is_empty() {
        println!("Image: {}", result.image_url);
    }
    Ok(())
}
