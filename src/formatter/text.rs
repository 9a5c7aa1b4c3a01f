use std::io::Write;
use std::path::PathBuf;

use crate::diagnostic::Diagnostic;
use crate::formatter::Formatter;

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_to(&self, diagnostics: &[Diagnostic], files: &[PathBuf], out: &mut dyn Write) {
        for d in diagnostics {
            let _ = writeln!(out, "{d}");
        }
        let diagnostic_word = if diagnostics.len() == 1 {
            "diagnostic"
        } else {
            "diagnostics"
        };
        let file_word = if files.len() == 1 { "file" } else { "files" };
        let _ = writeln!(
            out,
            "\n{} {file_word} checked, {} {diagnostic_word} found",
            files.len(),
            diagnostics.len(),
        );
    }
}
