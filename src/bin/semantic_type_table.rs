//! Generate the Markdown table of the 64 base semantic types.
//!
//! Usage:
//!   cargo run --bin semantic_type_table                                   # print to stdout
//!   cargo run --bin semantic_type_table -- --output docs/semantic_types.md # write to file
//!   cargo run --bin semantic_type_table -- --kind FLOW_CONTROL            # one kind only

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use semtypes::render::{render_taxonomy_markdown, taxonomy_rows};

#[derive(Parser)]
#[command(about = "Generate the semantic type taxonomy table")]
struct Args {
    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Only include types of this kind (e.g. LITERAL, FLOW_CONTROL)
    #[arg(long)]
    kind: Option<String>,
}

fn main() {
    let args = Args::parse();

    let mut rows = taxonomy_rows();
    if let Some(kind) = &args.kind {
        let kind = kind.to_uppercase();
        rows.retain(|r| r.kind == kind);
        if rows.is_empty() {
            eprintln!("error: unknown kind `{kind}`");
            process::exit(2);
        }
    }
    let out = render_taxonomy_markdown(&rows);

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!("error: failed to create {}: {e}", parent.display());
                    process::exit(3);
                }
            }
            if let Err(e) = fs::write(&path, &out) {
                eprintln!("error: failed to write {}: {e}", path.display());
                process::exit(3);
            }
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{out}"),
    }
}
