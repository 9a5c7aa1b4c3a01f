//! Def files to Markdown pages: parse, validate, render, then write or check.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::def_file::{LanguageDoc, parse_def_file};
use crate::diagnostic::Diagnostic;
use crate::render::{IndexEntry, IndexOptions, render_index, render_language};
use crate::validate::validate;

pub const INDEX_FILE: &str = "index.md";

/// One def file after parsing, validation and rendering.
#[derive(Debug)]
pub struct DefOutcome {
    pub source: PathBuf,
    pub doc: LanguageDoc,
    pub page: String,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    Missing,
    Outdated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleOutput {
    pub path: PathBuf,
    pub staleness: Staleness,
}

/// Parse, validate and render every file in parallel. Results come back
/// ordered by file name, then by full path.
pub fn process_def_files(files: &[PathBuf]) -> Result<Vec<DefOutcome>> {
    let mut outcomes = files
        .par_iter()
        .map(|path| process_def_file(path))
        .collect::<Result<Vec<_>>>()?;
    outcomes.sort_by(|a, b| {
        a.doc
            .file_name
            .cmp(&b.doc.file_name)
            .then_with(|| a.source.cmp(&b.source))
    });
    Ok(outcomes)
}

fn process_def_file(path: &Path) -> Result<DefOutcome> {
    let parsed = parse_def_file(path)?;
    let doc = parsed.doc;

    let mut diagnostics = parsed.diagnostics;
    diagnostics.extend(validate(&doc));
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let page = render_language(&doc);
    Ok(DefOutcome {
        source: path.to_path_buf(),
        doc,
        page,
        diagnostics,
    })
}

/// Every page plus, when `with_index` is set, `index.md`. Index entries use
/// the configured or built-in display name; page titles keep the file stem.
/// Two def files with the same language prefix would write the same page, so
/// that is an error.
pub fn plan_outputs(
    outcomes: &[DefOutcome],
    config: &Config,
    output_dir: &Path,
    with_index: bool,
) -> Result<Vec<OutputFile>> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    let mut outputs = Vec::with_capacity(outcomes.len() + 1);

    for outcome in outcomes {
        let prefix = outcome.doc.prefix();
        if let Some(first) = seen.insert(prefix, &outcome.source) {
            anyhow::bail!(
                "language `{prefix}` is defined by both {} and {}",
                first.display(),
                outcome.source.display()
            );
        }
        outputs.push(OutputFile {
            path: output_dir.join(format!("{prefix}.md")),
            contents: outcome.page.clone(),
        });
    }

    if with_index {
        let entries: Vec<IndexEntry> = outcomes
            .iter()
            .map(|o| IndexEntry {
                display_name: config.display_name(o.doc.prefix()),
                prefix: o.doc.prefix().to_string(),
                category: config.category(o.doc.prefix()),
            })
            .collect();
        let options = IndexOptions {
            category_order: config.category_order(),
            def_dir: def_dir_label(&config.def_dir()),
        };
        outputs.push(OutputFile {
            path: output_dir.join(INDEX_FILE),
            contents: render_index(&entries, &options),
        });
    }

    Ok(outputs)
}

fn def_dir_label(dir: &Path) -> String {
    let label = dir.to_string_lossy().replace('\\', "/");
    if label.ends_with('/') {
        label
    } else {
        format!("{label}/")
    }
}

pub fn write_outputs(outputs: &[OutputFile]) -> Result<()> {
    for output in outputs {
        if let Some(parent) = output.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&output.path, &output.contents)
            .with_context(|| format!("failed to write {}", output.path.display()))?;
    }
    Ok(())
}

/// Compare rendered outputs with what is on disk without writing anything.
pub fn check_outputs(outputs: &[OutputFile]) -> Result<Vec<StaleOutput>> {
    let mut stale = Vec::new();
    for output in outputs {
        let on_disk = match fs::read(&output.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                stale.push(StaleOutput {
                    path: output.path.clone(),
                    staleness: Staleness::Missing,
                });
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", output.path.display()));
            }
        };
        if content_digest(&on_disk) != content_digest(output.contents.as_bytes()) {
            stale.push(StaleOutput {
                path: output.path.clone(),
                staleness: Staleness::Outdated,
            });
        }
    }
    Ok(stale)
}

pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
