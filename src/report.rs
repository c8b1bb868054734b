//! Plain-text rendering of an [`AnalysisResult`].
//!
//! Used by the CLI's default output. Fields the model did not supply render
//! as `Unknown` / `N/A` so a partial object still prints.

use crate::output::AnalysisResult;
use crate::prompts::PromptVariant;
use serde_json::Value;
use std::fmt::Write;

/// Render a human-readable report for `result` under the active variant.
pub fn render_text_report(result: &AnalysisResult) -> String {
    render_for(result, PromptVariant::ACTIVE)
}

/// Render a report for an explicit variant.
pub fn render_for(result: &AnalysisResult, variant: PromptVariant) -> String {
    let mut out = String::new();
    let title = match variant {
        PromptVariant::ConstructionReview => "CONSTRUCTION CONTRACT ANALYSIS REPORT",
        PromptVariant::GeneralReview => "CONTRACT ANALYSIS REPORT",
    };
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
    let _ = writeln!(out);

    let _ = writeln!(out, "CONTRACT TYPE: {}", text_or(result, "contract_type", "Unknown"));
    let _ = writeln!(out, "OVERALL RISK: {}", text_or(result, "overall_risk", "Unknown"));

    match variant {
        PromptVariant::ConstructionReview => {
            let _ = writeln!(
                out,
                "CONTRACTOR PROTECTION SCORE: {}",
                score(result, "contractor_protection_score")
            );
            if let Some(Value::Object(breakdown)) = result.get("risk_breakdown") {
                let _ = writeln!(out, "\nRISK BREAKDOWN:");
                for (category, level) in breakdown {
                    let _ = writeln!(out, "• {}: {}", humanize(category), scalar(level));
                }
            }
            section(&mut out, "CRITICAL FINDINGS", result.get("critical_findings"), finding_line);
            section(&mut out, "FIELD TEAM ALERTS", result.get("field_team_alerts"), scalar);
            if let Some(Value::Object(benchmarks)) = result.get("industry_benchmarks") {
                let _ = writeln!(out, "\nINDUSTRY BENCHMARKS:");
                for (key, value) in benchmarks {
                    let _ = writeln!(out, "• {}: {}", humanize(key), scalar(value));
                }
            }
        }
        PromptVariant::GeneralReview => {
            let _ = writeln!(out, "RISK SCORE: {}", score(result, "risk_score"));
            let _ = writeln!(out);
            for (label, key) in [
                ("PAYMENT TERMS", "payment_terms"),
                ("LIABILITY", "liability"),
                ("TERMINATION", "termination"),
                ("INSURANCE", "insurance"),
            ] {
                let _ = writeln!(out, "{label}: {}", text_or(result, key, "Not specified"));
            }
            section(&mut out, "KEY RISKS", result.get("key_risks"), scalar);
        }
    }

    section(&mut out, "RECOMMENDATIONS", result.get("recommendations"), scalar);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generated: {}",
        result.analysis_timestamp().unwrap_or("unknown")
    );
    if let Some(name) = result.file_name() {
        let _ = writeln!(out, "Source: {} ({} bytes)", name, result.file_size().unwrap_or(0));
    }
    out
}

fn section(out: &mut String, heading: &str, items: Option<&Value>, line: fn(&Value) -> String) {
    let _ = writeln!(out, "\n{heading}:");
    match items {
        Some(Value::Array(items)) if !items.is_empty() => {
            for item in items {
                let _ = writeln!(out, "• {}", line(item));
            }
        }
        _ => {
            let _ = writeln!(out, "• None reported");
        }
    }
}

fn finding_line(v: &Value) -> String {
    match v {
        Value::Object(f) => {
            let get = |k: &str| f.get(k).map(scalar).unwrap_or_default();
            let mut s = format!("{}: {}", get("category"), get("finding"));
            for (label, key) in [("Impact", "impact"), ("Action", "action")] {
                let value = get(key);
                if !value.is_empty() {
                    let _ = write!(s, "\n  {label}: {value}");
                }
            }
            s
        }
        other => scalar(other),
    }
}

fn text_or(result: &AnalysisResult, key: &str, fallback: &str) -> String {
    match result.get(key) {
        Some(Value::Null) | None => fallback.to_string(),
        Some(v) => scalar(v),
    }
}

/// `38/100`, or bare `N/A` when the model gave no score.
fn score(result: &AnalysisResult, key: &str) -> String {
    match result.get(key) {
        Some(Value::Null) | None => "N/A".to_string(),
        Some(v) => format!("{}/100", scalar(v)),
    }
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `payment_risk` → `Payment Risk`.
fn humanize(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
