//! Fixed-layout text report.
//!
//! Same sections as the printable report: summary metrics, score chart,
//! severity distribution and categories, then every risk with its evidence and
//! recommendations. Lines are wrapped to [`REPORT_WIDTH`] columns and the
//! output is split into pages of [`PAGE_LINES`] lines with a footer.

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use super::summary::ReportSummary;
use crate::api::AnalysisResult;

/// Line width of the report.
pub const REPORT_WIDTH: usize = 80;

/// Lines per page, footer included.
pub const PAGE_LINES: usize = 60;

const BAR_WIDTH: usize = 40;
const FOOTER: &str = "Generated by RiskSight AI";

/// File name of the text report for a source document.
pub fn report_file_name(source_name: &str) -> String {
    let stem = source_name.rsplit_once('.').map_or(source_name, |(stem, _)| stem);
    let stem = if stem.is_empty() { "document" } else { stem };
    format!("risk-analysis-report-{}.txt", stem)
}

/// Render the report.
pub fn render_text_report(result: &AnalysisResult, generated_at: DateTime<Local>) -> String {
    let summary = ReportSummary::from_result(result);
    let mut lines: Vec<String> = Vec::new();

    lines.push("RISK ANALYSIS REPORT".to_string());
    lines.push(format!("Generated on: {}", generated_at.format("%B %-d, %Y %H:%M")));
    lines.push(String::new());

    // Summary
    lines.push(heading("Summary"));
    lines.push(format!("  Total Risks ......... {}", summary.total_risks));
    lines.push(format!("  Avg. Risk Score ..... {}", format_score(summary.overall_score)));
    lines.push(format!("  High Priority ....... {}", summary.high_priority));
    lines.push(format!("  Characters Analyzed . {}", summary.characters_analyzed));
    lines.push(format!("  Processing Time ..... {} sec", summary.processing_time.round()));
    for concern in &result.risk_summary.key_concerns {
        lines.extend(wrap(concern, REPORT_WIDTH, "  ! ", "    "));
    }
    lines.push(String::new());

    // Score chart
    lines.push(heading("Risk Score per Risk"));
    let max_score = summary.max_score();
    for bar in &summary.score_chart {
        let filled = if max_score > 0.0 {
            ((bar.score / max_score) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        lines.push(format!(
            "  {:<24} {:<width$} {}",
            truncate(&bar.title, 24),
            "#".repeat(filled.min(BAR_WIDTH)),
            format_score(bar.score),
            width = BAR_WIDTH
        ));
    }
    lines.push(String::new());

    // Distribution
    lines.push(heading("Risk Distribution"));
    for slice in &summary.distribution {
        lines.push(format!(
            "  {}: {} ({:.1}%)",
            slice.severity.label(),
            slice.count,
            slice.percentage
        ));
    }
    lines.push(String::new());

    lines.push(heading("Risk Categories"));
    for category in &summary.categories {
        lines.push(format!("  {:<24} {}", truncate(&category.category, 24), category.count));
    }
    lines.push(String::new());

    // Risks
    lines.push(heading("Identified Risks"));
    for (index, risk) in result.identified_risk.iter().enumerate() {
        let label = format!("[{}]", risk.severity.label());
        let title = truncate(
            &format!("{}. {}", index + 1, risk.title),
            REPORT_WIDTH - label.len() - 1,
        );
        let gap = REPORT_WIDTH.saturating_sub(title.chars().count() + label.len()).max(1);
        lines.push(format!("{}{}{}", title, " ".repeat(gap), label));
        let meta = format!(
            "{} | {} probability | score {}",
            risk.category,
            risk.probability,
            format_score(risk.risk_score)
        );
        lines.extend(wrap(&meta, REPORT_WIDTH, "   ", "   "));
        lines.extend(wrap(&risk.description, REPORT_WIDTH, "   ", "   "));

        if !risk.impact_areas.is_empty() {
            lines.extend(wrap(
                &format!("Impact areas: {}", risk.impact_areas.join(", ")),
                REPORT_WIDTH,
                "   ",
                "   ",
            ));
        }

        if !risk.context_evidence.is_empty() {
            lines.push("   Context Evidence:".to_string());
            let evidence = format!("\"{}\"", risk.context_evidence);
            lines.extend(wrap(&evidence, REPORT_WIDTH, "     ", "     "));
        }

        if !risk.mitigation_recommendations.is_empty() {
            lines.push("   Mitigation Recommendations:".to_string());
            for rec in &risk.mitigation_recommendations {
                lines.extend(wrap(rec, REPORT_WIDTH, "     - ", "       "));
            }
        }
        lines.push(String::new());
    }

    paginate(&lines)
}

fn heading(title: &str) -> String {
    format!("{}\n{}", title, "=".repeat(title.len()))
}

fn format_score(score: f64) -> String {
    let rounded = (score * 10.0).round() / 10.0;
    format!("{}", rounded)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Greedy word wrap. Words longer than a line are split.
fn wrap(text: &str, width: usize, first_indent: &str, indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = first_indent.to_string();
    let mut current_len = first_indent.chars().count();
    let mut empty = true;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let needed = if empty { word.len() } else { word.len() + 1 };
            if current_len + needed <= width {
                if !empty {
                    current.push(' ');
                }
                current.extend(word.iter());
                current_len += needed;
                empty = false;
                break;
            }

            if empty {
                // Longer than a whole line.
                let room = width.saturating_sub(current_len).max(1);
                let rest = word.split_off(room.min(word.len()));
                current.extend(word.iter());
                lines.push(std::mem::replace(&mut current, indent.to_string()));
                current_len = indent.chars().count();
                word = rest;
                if word.is_empty() {
                    break;
                }
            } else {
                lines.push(std::mem::replace(&mut current, indent.to_string()));
                current_len = indent.chars().count();
                empty = true;
            }
        }
    }

    if !empty {
        lines.push(current);
    }
    lines
}

fn paginate(lines: &[String]) -> String {
    // Headings carry an embedded underline.
    let flat: Vec<&str> = lines.iter().flat_map(|l| l.split('\n')).collect();
    let body_lines = PAGE_LINES - 2;
    let pages: Vec<&[&str]> =
        if flat.is_empty() { vec![&[][..]] } else { flat.chunks(body_lines).collect() };
    let total = pages.len();

    let mut out = String::new();
    for (index, page) in pages.iter().enumerate() {
        for line in page.iter() {
            let _ = writeln!(out, "{}", line.trim_end());
        }
        let page_label = format!("Page {} of {}", index + 1, total);
        let gap = REPORT_WIDTH.saturating_sub(FOOTER.len() + page_label.len());
        let _ = writeln!(out, "{}", "-".repeat(REPORT_WIDTH));
        let _ = writeln!(out, "{}{}{}", FOOTER, " ".repeat(gap), page_label);
        if index + 1 < total {
            out.push('\x0c');
            out.push('\n');
        }
    }
    out
}
