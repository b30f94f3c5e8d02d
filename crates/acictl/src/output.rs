//! Output formatting: table, JSON, plain.
//!
//! Renders change reports in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde, plain emits one word for scripting.

use std::collections::BTreeSet;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use aci_core::ChangeReport;

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct AttrRow {
    #[tabled(rename = "Attribute")]
    attribute: String,
    #[tabled(rename = "Existing")]
    existing: String,
    #[tabled(rename = "Proposed")]
    proposed: String,
    #[tabled(rename = "New")]
    new: String,
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a change report in the chosen format.
///
/// - `table`: a changed/unchanged headline, an attribute comparison table,
///   and the change document when one was computed
/// - `json` / `json-compact`: the full report via serde
/// - `plain`: just `changed` or `unchanged`
pub fn render_report(format: &OutputFormat, report: &ChangeReport, color: bool) -> String {
    match format {
        OutputFormat::Table => render_report_table(report, color),
        OutputFormat::Json => render_json(report, false),
        OutputFormat::JsonCompact => render_json(report, true),
        OutputFormat::Plain => {
            let word = if report.changed { "changed" } else { "unchanged" };
            word.to_string()
        }
    }
}

fn render_report_table(report: &ChangeReport, color: bool) -> String {
    let mut out = String::new();

    let headline = if report.changed {
        if color {
            format!("{}", "changed".green().bold())
        } else {
            "changed".to_string()
        }
    } else if color {
        format!("{}", "unchanged".dimmed())
    } else {
        "unchanged".to_string()
    };
    out.push_str(&headline);
    out.push('\n');

    let rows = attr_rows(report);
    if !rows.is_empty() {
        out.push_str(&Table::new(&rows).with(Style::rounded()).to_string());
        out.push('\n');
    }

    if !report.xmldoc.is_empty() {
        out.push_str("\nChange document:\n");
        out.push_str(&report.xmldoc);
    }

    out.trim_end().to_string()
}

fn attr_rows(report: &ChangeReport) -> Vec<AttrRow> {
    let mut keys: BTreeSet<&str> = BTreeSet::new();
    keys.extend(report.proposed.iter().map(|(k, _)| k));
    keys.extend(report.existing.iter().map(|(k, _)| k));
    if let Some(ref new) = report.new {
        keys.extend(new.iter().map(|(k, _)| k));
    }

    keys.into_iter()
        .map(|key| AttrRow {
            attribute: key.to_string(),
            existing: report.existing.get(key).unwrap_or_default().to_string(),
            proposed: report.proposed.get(key).unwrap_or_default().to_string(),
            new: report
                .new
                .as_ref()
                .and_then(|n| n.get(key))
                .unwrap_or_default()
                .to_string(),
        })
        .collect()
}

fn render_json(report: &ChangeReport, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(report)
    } else {
        serde_json::to_string_pretty(report)
    };
    result.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
