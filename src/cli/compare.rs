use anyhow::Result;
use comfy_table::{Cell, Table};

use super::best_rate::format_result;
use super::ui::{StyleType, header_cell, new_styled_table, rate_cell, style_text, unavailable_cell};
use crate::aggregator::{RateAggregator, select_best};
use crate::core::{ConversionRequest, RateResult};

/// Shows every provider's answer next to the selected best rate.
pub async fn run(aggregator: &RateAggregator, request: &ConversionRequest) -> Result<()> {
    if aggregator.is_empty() {
        println!("No providers configured.");
        return Ok(());
    }

    let results = aggregator.quote_all(request).await;
    let best = select_best(&results);

    println!(
        "\n{}",
        style_text(
            &format!(
                "{} {} -> {}",
                request.amount, request.source_currency, request.target_currency
            ),
            StyleType::Title
        )
    );
    println!("{}", build_table(&results, &best));
    println!(
        "{}",
        style_text(&answered_summary(&results, aggregator.len()), StyleType::Subtle)
    );
    println!("{}", format_result(&best));
    Ok(())
}

fn answered_summary(results: &[RateResult], provider_count: usize) -> String {
    let answered = results.iter().filter(|r| r.is_success()).count();
    format!("{answered} of {provider_count} providers answered")
}

fn build_table(results: &[RateResult], best: &RateResult) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Provider"),
        header_cell("Rate"),
        header_cell("Status"),
    ]);

    // Only the first matching success is the selected one.
    let mut best_marked = false;
    for result in results {
        let is_best = !best_marked && result.is_success() && result == best;
        best_marked |= is_best;

        let rate = if result.is_success() {
            rate_cell(result.rate().to_string(), is_best)
        } else {
            unavailable_cell()
        };
        let status = match (result.is_success(), is_best) {
            (true, true) => style_text("best", StyleType::Best),
            (true, false) => style_text("ok", StyleType::Subtle),
            (false, _) => style_text(
                result.error_message().unwrap_or("failed"),
                StyleType::Error,
            ),
        };

        table.add_row(vec![Cell::new(result.provider_name()), rate, Cell::new(status)]);
    }
    table
}
