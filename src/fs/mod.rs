use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use crate::config::Config;

pub const DEF_SUFFIX: &str = "_types.def";

pub fn is_def_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(DEF_SUFFIX) && n.len() > DEF_SUFFIX.len())
}

/// Discover `*_types.def` files under the given paths, respecting .gitignore
/// and the configured exclude patterns.
pub fn discover_def_files(paths: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>> {
    let excludes = config.exclude_set()?;
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            // Direct file paths bypass the name filter but not the excludes
            if !excludes.is_match(path) {
                files.push(path.clone());
            }
        } else if path.is_dir() {
            files.extend(walk_directory(path, config)?);
        } else {
            anyhow::bail!("path does not exist: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_directory(dir: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(dir);
    builder.hidden(true).git_ignore(true).git_global(true);

    if !config.exclude.is_empty() {
        let mut overrides = OverrideBuilder::new(dir);
        for pattern in &config.exclude {
            overrides
                .add(&format!("!{pattern}"))
                .with_context(|| format!("invalid exclude pattern: {pattern}"))?;
        }
        let overrides = overrides.build().context("failed to build overrides")?;
        builder.overrides(overrides);
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("error walking directory")?;
        let path = entry.path();
        if path.is_file() && is_def_file(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
