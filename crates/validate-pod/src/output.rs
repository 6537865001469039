//! Rendering diagnostics for the terminal and for machines.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use clap::ValueEnum;
use pod_validation::{Diagnostic, ValidationErrorKind};
use serde_json::{Value, json};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `<file>:<line> <message>`, one per line
    #[default]
    Text,
    /// A JSON array of diagnostics on stdout
    Json,
    /// Source snippets with the offending node underlined
    Pretty,
}

/// `<file>:<line> <message>`, or `<file> <message>` for unlocated ones.
pub fn render_text(file: &str, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        if diagnostic.line > 0 {
            out.push_str(&format!("{}:{} {}\n", file, diagnostic.line, diagnostic.message()));
        } else {
            out.push_str(&format!("{} {}\n", file, diagnostic.message()));
        }
    }
    out
}

/// [`Diagnostic::to_json`] with the file name added.
pub fn json_entries(file: &str, diagnostics: &[Diagnostic]) -> Vec<Value> {
    diagnostics
        .iter()
        .map(|diagnostic| {
            let mut entry = diagnostic.to_json();
            entry["file"] = json!(file);
            entry
        })
        .collect()
}

/// Render each diagnostic as an ariadne report against `source`.
///
/// Diagnostics without a span get the plain `Error: [code] message` header.
pub fn render_pretty(file: &str, source: &str, diagnostics: &[Diagnostic], color: bool) -> String {
    let char_count = source.chars().count();
    let mut out = String::new();

    for diagnostic in diagnostics {
        let title = format!("[{}] {}", diagnostic.code(), diagnostic.message());

        let Some(span) = &diagnostic.span else {
            out.push_str(&format!("Error: {}\n  in {}\n", title, file));
            if let ValidationErrorKind::ParseFailure { detail } = &diagnostic.kind {
                out.push_str(&format!("  {}\n", detail));
            }
            out.push('\n');
            continue;
        };

        let start = span.offset.min(char_count);
        let end = span.end_offset().max(start + 1).min(char_count).max(start);

        let report = Report::build(ReportKind::Error, file.to_string(), start)
            .with_config(Config::default().with_color(color))
            .with_message(&title)
            .with_label(
                Label::new((file.to_string(), start..end))
                    .with_message(diagnostic.category().to_string())
                    .with_color(Color::Red),
            )
            .finish();

        let mut buffer = Vec::new();
        match report.write((file.to_string(), Source::from(source)), &mut buffer) {
            Ok(()) => out.push_str(&String::from_utf8_lossy(&buffer)),
            Err(error) => {
                tracing::warn!(%error, "cannot render source snippet");
                out.push_str(&format!("Error: {}\n", title));
            }
        }
    }
    out
}
