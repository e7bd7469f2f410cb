use super::{local_time, print_json, print_list};
use crate::cli::{OutputFormat, SeoCommand};
use crate::state::AppState;
use crate::tools::Identified;
use crate::tools::seo::{self, ManualSeoRequest, ManualSeoResult, SeoAnalysis, UrlSeoRequest, UrlSeoResult};

pub async fn run(state: &mut AppState, command: SeoCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        SeoCommand::Manual {
            name,
            description,
            keywords,
        } => {
            let request = ManualSeoRequest {
                product_name: name,
                product_description: description,
                target_keywords: keywords,
                ..Default::default()
            };
            let result = state
                .run_tool(|backend, ctx| async move { seo::analyze_manual(backend.as_ref(), &ctx, &request).await })
                .await?;
            print_manual(&result, format)
        }
        SeoCommand::Url { url } => {
            let request = UrlSeoRequest {
                url,
                ..Default::default()
            };
            let result = state
                .run_tool(|backend, ctx| async move { seo::analyze_url(backend.as_ref(), &ctx, &request).await })
                .await?;
            print_url(&result, format)
        }
        SeoCommand::History => {
            let mut history = seo::analyses();
            state.reload_records(&mut history).await?;
            if format == OutputFormat::Json {
                return print_json(&history.items());
            }
            if history.items().is_empty() {
                println!("No saved analyses");
            }
            for analysis in history.items() {
                println!(
                    "{:>6}  {}  {:<6} {:>3}/100  {}",
                    analysis.id(),
                    local_time(&analysis.created_at()),
                    analysis.analysis_type(),
                    analysis.score(),
                    analysis.subject()
                );
            }
            Ok(())
        }
        SeoCommand::Show { id } => {
            let analysis = state
                .run_tool(|backend, ctx| async move { seo::get_analysis(backend.as_ref(), &ctx, id).await })
                .await?;
            if format == OutputFormat::Json {
                return print_json(&analysis);
            }
            match &analysis {
                SeoAnalysis::Manual(record) => print_manual(&record.response_data, format),
                SeoAnalysis::Url(record) => print_url(&record.response_data, format),
            }
        }
        SeoCommand::Delete { id } => {
            let mut history = seo::analyses();
            state.delete_record(&mut history, id).await?;
            Ok(())
        }
    }
}

fn print_manual(result: &ManualSeoResult, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(result);
    }
    println!("Score: {}/100", result.score);
    println!("Title: {}", result.title);
    println!("Meta:  {}", result.meta_description);
    println!("Keywords: {}", result.keywords.join(", "));
    println!();
    println!("{}", result.seo_description);
    print_list("Recommendations", &result.recommendations);
    Ok(())
}

fn print_url(result: &UrlSeoResult, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(result);
    }
    println!("{}: {}/100", result.url, result.seo_score);
    for (segment, score) in &result.segment_scores {
        println!("  {:<24} {}", segment, score);
    }
    if !result.action_items.is_empty() {
        println!("Action items:");
        println!("{}", serde_json::to_string_pretty(&result.action_items)?);
    }
    Ok(())
}
