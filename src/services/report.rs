//! Report Module
//!
//! Renders an analysis result into the markdown report served to clients.

use crate::services::analyzer::AnalysisResult;

/// Wraps insights in the final report layout.
///
/// # Arguments
/// * `result` - Analysis to render
///
/// # Returns
/// * `String` - Markdown report with title and generation footer
pub fn render_report(result: &AnalysisResult) -> String {
    format!(
        "# Trade Opportunity Analysis: {}\n\n{}\n\n---\n*Generated at {} UTC*",
        title_case(&result.sector),
        result.insights.trim(),
        result.analyzed_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Turns a sanitized sector slug into a display title.
/// "real-estate" becomes "Real Estate".
pub(crate) fn title_case(slug: &str) -> String {
    slug.split(['-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_report_layout() {
        let result = AnalysisResult {
            sector: "real-estate".to_string(),
            insights: "## Market Overview\nSteady growth.".to_string(),
            analyzed_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
        };

        let report = render_report(&result);

        assert!(report.starts_with("# Trade Opportunity Analysis: Real Estate"));
        assert!(report.contains("## Market Overview\nSteady growth."));
        assert!(report.ends_with("*Generated at 2024-06-01 12:30:00 UTC*"));
    }

    #[test]
    fn test_render_report_trims_insights() {
        let result = AnalysisResult {
            sector: "pharma".to_string(),
            insights: "\n\n  body  \n\n".to_string(),
            analyzed_at: Utc::now(),
        };

        let report = render_report(&result);

        assert!(report.contains("Pharma\n\nbody\n\n---"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("technology"), "Technology");
        assert_eq!(title_case("real-estate"), "Real Estate");
        assert_eq!(title_case("food-and-beverage"), "Food And Beverage");
        assert_eq!(title_case(""), "");
    }
}
