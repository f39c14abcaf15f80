//! View data derived from an analysis result.
//!
//! Everything the overview, charts and details views show, computed once.

use std::collections::BTreeMap;

use crate::api::{AnalysisResult, RiskItem, Severity};

/// One bar of the risk score chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBar {
    pub risk_id: String,
    pub title: String,
    pub score: f64,
    pub severity: Severity,
}

/// One slice of the severity distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSlice {
    pub severity: Severity,
    pub count: u32,
    /// Share of all risks, 0-100
    pub percentage: f64,
}

/// Number of risks in a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Summary of an analysis for display and export.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total_risks: u32,
    pub overall_score: f64,
    pub high_priority: u32,
    pub characters_analyzed: u64,
    pub processing_time: f64,
    pub score_chart: Vec<ScoreBar>,
    /// Non-empty severities, most urgent first
    pub distribution: Vec<DistributionSlice>,
    /// Categories by descending count, ties by name
    pub categories: Vec<CategoryCount>,
}

impl ReportSummary {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let summary = &result.risk_summary;

        let score_chart = result
            .identified_risk
            .iter()
            .map(|risk| ScoreBar {
                risk_id: risk.risk_id.clone(),
                title: risk.title.clone(),
                score: risk.risk_score,
                severity: risk.severity,
            })
            .collect();

        let total = summary.total_risks;
        let distribution = Severity::ALL
            .iter()
            .map(|&severity| (severity, summary.risk_distribution.count(severity)))
            .filter(|(_, count)| *count > 0)
            .map(|(severity, count)| DistributionSlice {
                severity,
                count,
                percentage: if total == 0 {
                    0.0
                } else {
                    f64::from(count) * 100.0 / f64::from(total)
                },
            })
            .collect();

        Self {
            total_risks: total,
            overall_score: summary.overall_risk_score,
            high_priority: summary.risk_distribution.high_priority(),
            characters_analyzed: result.document_analysis.document_length,
            processing_time: result.processing_time,
            score_chart,
            distribution,
            categories: category_counts(&result.identified_risk),
        }
    }

    /// Highest score in the chart, used to scale bars.
    pub fn max_score(&self) -> f64 {
        self.score_chart.iter().map(|b| b.score).fold(0.0, f64::max)
    }
}

/// Count risks per category.
pub fn category_counts(risks: &[RiskItem]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for risk in risks {
        *counts.entry(risk.category.as_str()).or_default() += 1;
    }

    let mut categories: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category: category.to_string(), count })
        .collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    categories
}

/// Hex color for a risk category, grey for unknown ones.
pub fn category_color(category: &str) -> &'static str {
    match category {
        "financial" => "#3b82f6",
        "market" => "#8b5cf6",
        "operational" => "#10b981",
        "compliance" | "regulatory" => "#f59e0b",
        "technology" => "#06b6d4",
        _ => "#9ca3af",
    }
}
