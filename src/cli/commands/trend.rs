use super::{local_time, or_dash, print_json, print_list};
use crate::cli::{OutputFormat, TrendCommand};
use crate::state::AppState;
use crate::tools::trend::{self, TrendRequest, TrendResponse};

pub async fn run(state: &mut AppState, command: TrendCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        TrendCommand::Suggest {
            category,
            country,
            budget,
            audience,
            notes,
            count,
            no_trends,
        } => {
            let request = TrendRequest {
                category,
                target_country: country,
                budget_range: budget,
                target_audience: audience,
                additional_notes: notes,
                include_trends: !no_trends,
                product_count: count,
                ..Default::default()
            };
            let response = state
                .run_tool(|backend, ctx| async move { trend::suggest(backend.as_ref(), &ctx, &request).await })
                .await?;
            print_response(&response, format)
        }
        TrendCommand::History => {
            let mut history = trend::suggestions();
            state.reload_records(&mut history).await?;
            if format == OutputFormat::Json {
                return print_json(&history.items());
            }
            if history.items().is_empty() {
                println!("No saved suggestions");
            }
            for record in history.items() {
                println!(
                    "{:>6}  {}  {:<20} {} product(s)",
                    record.id,
                    local_time(&record.created_at),
                    or_dash(record.request_data.category.as_deref()),
                    record.response_data.products.len()
                );
            }
            Ok(())
        }
        TrendCommand::Show { id } => {
            let record = state
                .run_tool(|backend, ctx| async move { trend::get_suggestion(backend.as_ref(), &ctx, id).await })
                .await?;
            if format == OutputFormat::Json {
                return print_json(&record);
            }
            println!("#{} from {}", record.id, local_time(&record.created_at));
            print_response(&record.response_data, format)
        }
        TrendCommand::Delete { id } => {
            let mut history = trend::suggestions();
            state.delete_record(&mut history, id).await?;
            Ok(())
        }
    }
}

fn print_response(response: &TrendResponse, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(response);
    }

    for (i, product) in response.products.iter().enumerate() {
        println!("{}. {}", i + 1, product.product_idea);
        println!("   {}", product.description);
        println!(
            "   trend {}/10, competition {}/10, price {}, margin {}, demand {}",
            product.trend_score,
            product.competition_score,
            or_dash(product.recommended_price_range.as_deref()),
            or_dash(product.profit_margin_estimate.as_deref()),
            or_dash(product.estimated_demand.as_deref())
        );
    }
    if let Some(trends) = &response.trends_data {
        println!("Google Trends: '{}' scored {}/100", trends.keyword, trends.trend_score);
    }
    if !response.summary.is_empty() {
        println!();
        println!("{}", response.summary);
    }
    print_list("Next steps", &response.next_steps);
    Ok(())
}
