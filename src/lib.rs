pub mod adapter;
pub mod cli;
pub mod config;
pub mod def_file;
pub mod diagnostic;
pub mod extraction;
pub mod formatter;
pub mod fs;
pub mod generate;
pub mod languages;
pub mod registry;
pub mod render;
pub mod semantic;
pub mod syntax;
pub mod validate;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};

use adapter::{AdapterRegistry, flatten};
use cli::Args;
use config::load_config;
use diagnostic::Diagnostic;
use formatter::create_formatter;
use fs::discover_def_files;
use generate::{Staleness, check_outputs, plan_outputs, process_def_files, write_outputs};
use render::{render_taxonomy_text, taxonomy_rows};
use syntax::SourceFile;

/// Run the tool. Returns the exit code: 0 = success, 1 = diagnostics at or
/// above the fail level, or stale output under `--check`.
pub fn run(args: Args) -> Result<i32> {
    if args.list_types {
        return list_types(&args);
    }
    if let Some(ref path) = args.parse {
        return parse_source(&args, path);
    }

    let config_start = Instant::now();
    let config = load_config(args.config.as_deref())?;
    if args.debug {
        eprintln!("debug: config loading: {:.0?}", config_start.elapsed());
        match config.source() {
            Some(path) => eprintln!("debug: config loaded from: {}", path.display()),
            None => eprintln!("debug: no config file found"),
        }
        eprintln!("debug: excludes: {:?}", config.exclude);
    }

    let paths = if args.paths.is_empty() {
        vec![config.def_dir()]
    } else {
        args.paths.clone()
    };
    let files = discover_def_files(&paths, &config)?;
    if args.debug {
        eprintln!("debug: {} def files discovered", files.len());
    }

    let process_start = Instant::now();
    let outcomes = process_def_files(&files)?;
    let diagnostics: Vec<Diagnostic> = outcomes
        .iter()
        .flat_map(|o| o.diagnostics.iter().cloned())
        .collect();
    if args.debug {
        let rows: usize = outcomes.iter().map(|o| o.doc.row_count()).sum();
        eprintln!(
            "debug: parsed {} files ({rows} rows) in {:.0?}",
            outcomes.len(),
            process_start.elapsed()
        );
    }

    let fail_severity = args.fail_severity();
    let failing = diagnostics.iter().any(|d| d.severity >= fail_severity);
    let formatter = create_formatter(&args.format);

    if args.validate {
        formatter.print(&diagnostics, &files);
        return Ok(if failing { 1 } else { 0 });
    }

    // Pages go to stdout under --stdout, so diagnostics go to stderr.
    if !diagnostics.is_empty() {
        let mut stderr = std::io::stderr().lock();
        formatter.format_to(&diagnostics, &files, &mut stderr);
    }
    if failing {
        return Ok(1);
    }

    let output_dir = args.output.clone().unwrap_or_else(|| config.output_dir());
    let with_index = config.index_enabled() && !args.no_index;
    let outputs = plan_outputs(&outcomes, &config, &output_dir, with_index)?;

    if args.check {
        let stale = check_outputs(&outputs)?;
        for s in &stale {
            let reason = match s.staleness {
                Staleness::Missing => "missing",
                Staleness::Outdated => "out of date",
            };
            println!("{}: {reason}", s.path.display());
        }
        if args.debug {
            eprintln!("debug: {} outputs checked, {} stale", outputs.len(), stale.len());
        }
        return Ok(if stale.is_empty() { 0 } else { 1 });
    }

    if args.stdout {
        for output in &outputs {
            print!("{}", output.contents);
        }
        return Ok(0);
    }

    let write_start = Instant::now();
    write_outputs(&outputs)?;
    if args.debug {
        eprintln!("debug: writing outputs: {:.0?}", write_start.elapsed());
    }
    println!(
        "Generated {} files in {}",
        outputs.len(),
        output_dir.display()
    );
    Ok(0)
}

fn list_types(args: &Args) -> Result<i32> {
    let rows = taxonomy_rows();
    if args.format == "json" {
        let json = serde_json::to_string_pretty(&rows).context("failed to serialize taxonomy")?;
        println!("{json}");
    } else {
        print!("{}", render_taxonomy_text(&rows));
    }
    Ok(0)
}

fn parse_source(args: &Args, path: &Path) -> Result<i32> {
    let registry = AdapterRegistry::builtin()?;
    let adapter = match &args.language {
        Some(language) => registry.get(language).ok_or_else(|| {
            anyhow!(
                "unknown language `{language}` (available: {})",
                registry.languages().join(", ")
            )
        })?,
        None => path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| registry.for_extension(e))
            .ok_or_else(|| {
                anyhow!(
                    "cannot infer language for {}; pass --language",
                    path.display()
                )
            })?,
    };
    if args.debug {
        eprintln!("debug: parsing {} as {}", path.display(), adapter.language_name());
    }

    let parse_start = Instant::now();
    let source = SourceFile::from_path(path)?;
    let tree = adapter.parse(source);
    let rows = flatten(&tree, adapter);
    if args.debug {
        eprintln!("debug: {} nodes in {:.0?}", rows.len(), parse_start.elapsed());
    }

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&rows).context("failed to serialize nodes")?;
        println!("{json}");
    } else {
        for row in &rows {
            let mut line = format!(
                "{}{} {}:{}-{}:{} {}",
                "  ".repeat(row.depth),
                row.kind,
                row.start_line,
                row.start_column,
                row.end_line,
                row.end_column,
                row.semantic_type,
            );
            if !row.name.is_empty() {
                line.push_str(&format!(" `{}`", row.name));
            }
            println!("{line}");
        }
    }
    Ok(0)
}
