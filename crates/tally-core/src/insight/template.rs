//! Deterministic summary template and advisor prompt

use crate::aggregate::SpendingSummary;

/// Render the always-available spending summary text
///
/// Pure function of the summary: same input, same text. This is both the
/// no-AI path and the fallback when generation fails, so the two are
/// guaranteed to read identically.
pub fn render_template(summary: &SpendingSummary) -> String {
    let mut text = String::new();

    text.push_str("📊 **Your Spending Summary**\n\n");
    text.push_str(&format!(
        "Total spent: ${:.2} across {} transactions\n",
        summary.total, summary.transaction_count
    ));
    text.push_str(&format!(
        "Average per transaction: ${:.2}\n",
        summary.average_transaction
    ));

    text.push_str("\n**Top Categories:**\n");
    for total in summary.by_category.iter().take(3) {
        text.push_str(&format!(
            "• {}: ${:.2} ({:.1}%)\n",
            total.category, total.amount, total.percentage
        ));
    }

    text.push_str("\n💡 **Quick Tips:**\n");
    if let Some(top) = summary.top_category {
        text.push_str(&format!("• Your highest spending is in {}\n", top));
    }
    text.push_str("• Consider setting a budget for categories where you spend most\n");
    text.push_str("• Track your spending weekly to identify patterns");

    text
}

/// Build the financial-advisor prompt for the text generation backend
pub fn build_prompt(summary: &SpendingSummary) -> String {
    let mut prompt = String::from(
        "You are a helpful financial advisor. Analyze this spending data and \
         provide personalized, actionable insights:\n\n",
    );

    prompt.push_str(&format!("Total Spending: ${:.2}\n", summary.total));
    prompt.push_str(&format!(
        "Number of Transactions: {}\n",
        summary.transaction_count
    ));
    prompt.push_str(&format!(
        "Average Transaction: ${:.2}\n",
        summary.average_transaction
    ));
    if let Some(delta) = summary.month_over_month {
        let sign = if delta > 0.0 { "+" } else { "" };
        prompt.push_str(&format!("Month-over-Month Change: {}{:.1}%\n", sign, delta));
    }

    prompt.push_str("\nCategory Breakdown:\n");
    for total in &summary.by_category {
        prompt.push_str(&format!(
            "- {}: ${:.2} ({:.1}%)\n",
            total.category, total.amount, total.percentage
        ));
    }

    prompt.push_str(
        "\nProvide:\n\
         1. A brief overview of spending patterns (2-3 sentences)\n\
         2. Top 2-3 actionable recommendations to save money or optimize spending\n\
         3. One positive observation about their financial habits\n\n\
         Keep your response concise (max 200 words) and friendly.",
    );

    prompt
}
