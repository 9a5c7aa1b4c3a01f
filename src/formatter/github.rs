use std::io::Write;
use std::path::PathBuf;

use crate::diagnostic::{Diagnostic, Severity};
use crate::formatter::Formatter;

/// GitHub Actions workflow commands, one annotation per diagnostic.
pub struct GithubFormatter;

impl Formatter for GithubFormatter {
    fn format_to(&self, diagnostics: &[Diagnostic], _files: &[PathBuf], out: &mut dyn Write) {
        for d in diagnostics {
            let level = match d.severity {
                Severity::Convention => "notice",
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            let _ = writeln!(
                out,
                "::{level} file={},line={},col={}::{}: {}",
                d.path, d.location.line, d.location.column, d.check_name, d.message,
            );
        }
    }
}
