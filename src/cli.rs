use std::path::PathBuf;

use clap::Parser;

use crate::diagnostic::Severity;

#[derive(Parser, Debug)]
#[command(
    name = "semtypes",
    version,
    about = "Validate semantic node type tables and generate their Markdown reference"
)]
pub struct Args {
    /// Def files or directories (default: the configured def_dir)
    pub paths: Vec<PathBuf>,

    /// Path to configuration file (default: .semtypes.yml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for generated pages (default: the configured output_dir)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Diagnostic output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json", "github"])]
    pub format: String,

    /// Render in memory and compare with the files on disk; write nothing
    #[arg(long, conflicts_with_all = ["validate", "stdout"])]
    pub check: bool,

    /// Validate def files without rendering
    #[arg(long, conflicts_with = "stdout")]
    pub validate: bool,

    /// Do not generate index.md
    #[arg(long)]
    pub no_index: bool,

    /// Print rendered pages to stdout instead of writing them
    #[arg(long)]
    pub stdout: bool,

    /// Minimum severity that makes the run fail
    #[arg(long, default_value = "error", value_parser = ["convention", "warning", "error", "C", "W", "E"])]
    pub fail_level: String,

    /// Print the semantic type taxonomy, then exit
    #[arg(long)]
    pub list_types: bool,

    /// Parse a source file with a language adapter and print its nodes, then exit
    #[arg(long, value_name = "FILE")]
    pub parse: Option<PathBuf>,

    /// Adapter for --parse (default: chosen by file extension)
    #[arg(long, value_name = "LANG", requires = "parse")]
    pub language: Option<String>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    pub fn fail_severity(&self) -> Severity {
        Severity::from_str(&self.fail_level).unwrap_or(Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["semtypes"]).unwrap();
        assert!(args.paths.is_empty());
        assert_eq!(args.format, "text");
        assert_eq!(args.fail_severity(), Severity::Error);
        assert!(!args.check && !args.validate && !args.stdout && !args.no_index);
    }

    #[test]
    fn flags_parse() {
        let args = Args::try_parse_from([
            "semtypes",
            "defs",
            "-o",
            "out",
            "-f",
            "json",
            "--no-index",
            "--fail-level",
            "warning",
            "--debug",
        ])
        .unwrap();
        assert_eq!(args.paths, vec![PathBuf::from("defs")]);
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.format, "json");
        assert!(args.no_index && args.debug);
        assert_eq!(args.fail_severity(), Severity::Warning);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Args::try_parse_from(["semtypes", "-f", "xml"]).is_err());
        assert!(Args::try_parse_from(["semtypes", "--fail-level", "fatal"]).is_err());
        assert!(Args::try_parse_from(["semtypes", "--check", "--stdout"]).is_err());
        assert!(Args::try_parse_from(["semtypes", "--language", "json"]).is_err());
    }
}
