use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::diagnostic::Diagnostic;
use crate::formatter::Formatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput {
    metadata: Metadata,
    diagnostics: Vec<Entry>,
}

#[derive(Serialize)]
struct Metadata {
    files_checked: usize,
    diagnostic_count: usize,
}

#[derive(Serialize)]
struct Entry {
    path: String,
    line: usize,
    column: usize,
    severity: String,
    check_name: String,
    message: String,
}

impl Formatter for JsonFormatter {
    fn format_to(&self, diagnostics: &[Diagnostic], files: &[PathBuf], out: &mut dyn Write) {
        let output = JsonOutput {
            metadata: Metadata {
                files_checked: files.len(),
                diagnostic_count: diagnostics.len(),
            },
            diagnostics: diagnostics
                .iter()
                .map(|d| Entry {
                    path: d.path.clone(),
                    line: d.location.line,
                    column: d.location.column,
                    severity: d.severity.letter().to_string(),
                    check_name: d.check_name.clone(),
                    message: d.message.clone(),
                })
                .collect(),
        };
        if let Ok(json) = serde_json::to_string_pretty(&output) {
            let _ = writeln!(out, "{json}");
        }
    }
}
