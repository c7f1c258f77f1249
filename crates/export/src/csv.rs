//! Two-section CSV rendering of an estimate: summary metrics, a blank line,
//! then the monthly breakdown.
use forecast::EstimateResult;

/// Suggested download name for [`render_csv`] output.
pub const CSV_FILE_NAME: &str = "google-ads-forecast.csv";

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Render `result` as CSV with `\n` line endings and no trailing newline.
pub fn render_csv(result: &EstimateResult) -> String {
    let summary = [
        ("Estimated Spend (Total)", result.total_spend),
        ("Estimated Revenue (Total)", result.total_revenue),
        ("ROI (%)", result.roi_pct),
        ("Estimated CPC", result.estimated_cpc),
        ("Estimated CPM", result.estimated_cpm),
    ];

    let mut lines = Vec::with_capacity(summary.len() + result.monthly_breakdown.len() + 3);
    lines.push("Metric,Value".to_string());
    lines.extend(
        summary
            .iter()
            .map(|(label, value)| format!("{label},{value}")),
    );
    lines.push(String::new());
    lines.push("Month,Spend,Revenue".to_string());
    lines.extend(
        result
            .monthly_breakdown
            .iter()
            .map(|m| format!("{},{},{}", m.month, m.spend, m.revenue)),
    );

    lines.join("\n")
}
