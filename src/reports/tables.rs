//! Plain-text tables for the CLI and the weekly report.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::models::allocation::AllocationReport;
use crate::models::plan::Plan;
use crate::models::signal::SignalResult;
use crate::signals::aggregation::PlanSummary;
use crate::signals::scoring::RiskAssessment;

/// `🟥 ALERT` / `✅ OK` / `❔ UNKNOWN`
pub fn status_cell(result: &SignalResult) -> String {
    format!("{} {}", result.status.glyph(), result.status)
}

pub fn render_signal_table(results: &[SignalResult]) -> String {
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            vec![
                status_cell(r),
                r.detail.clone(),
                r.plan.title().to_string(),
                r.action.clone(),
            ]
        })
        .collect();
    render_table(&["Status", "Signal", "Plan", "Action"], &rows)
}

/// One line per plan with its score and verdict.
pub fn render_plan_badges(plans: &BTreeMap<Plan, PlanSummary>) -> String {
    let mut out = String::new();
    for summary in plans.values() {
        let _ = write!(
            out,
            "{}: {}/{} {}",
            summary.plan.title(),
            summary.score,
            summary.max_score,
            summary.verdict.message()
        );
        if summary.unknown > 0 {
            let _ = write!(out, " ({} unknown)", summary.unknown);
        }
        out.push('\n');
    }
    out
}

pub fn render_risk(risk: &RiskAssessment) -> String {
    let mut out = format!(
        "Risk score: {}/{}  {}",
        risk.score,
        risk.max_score,
        risk.level.message()
    );
    if risk.unknown > 0 {
        let _ = write!(out, " ({} unknown)", risk.unknown);
    }
    out
}

pub fn render_allocation_table(report: &AllocationReport) -> String {
    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            vec![
                row.asset_class.clone(),
                format!("{:.2}", row.amount),
                format!("{:.2}%", row.current_pct),
                row.target_pct
                    .map(|t| format!("{t:.2}%"))
                    .unwrap_or_else(|| "-".to_string()),
                row.deviation
                    .map(|d| format!("{d:+.2}%"))
                    .unwrap_or_else(|| "-".to_string()),
                row.status.label().to_string(),
            ]
        })
        .collect();

    let mut out = render_table(
        &["Asset Class", "Amount", "Current %", "Target %", "Deviation", "Status"],
        &rows,
    );
    let _ = writeln!(out, "Total: {:.2}  Tolerance: ±{}%", report.total, report.tolerance);
    if report.skipped_rows > 0 {
        let _ = writeln!(out, "Skipped rows: {}", report.skipped_rows);
    }
    out.push_str(if report.aligned {
        "✅ Allocation within tolerance\n"
    } else {
        "⚠️ Allocation needs rebalancing\n"
    });
    out
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}
