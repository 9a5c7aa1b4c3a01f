use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::languages;

pub const DEFAULT_CONFIG_FILE: &str = ".semtypes.yml";
pub const DEFAULT_DEF_DIR: &str = "src/language_configs";
pub const DEFAULT_OUTPUT_DIR: &str = "docs/reference/languages";

/// Per-language override of the builtin language table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguageOverride {
    pub display_name: Option<String>,
    pub category: Option<String>,
}

/// Settings read from `.semtypes.yml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub def_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub index: Option<bool>,
    pub category_order: Vec<String>,
    pub languages: BTreeMap<String, LanguageOverride>,
    #[serde(skip)]
    source: Option<PathBuf>,
}

/// Load `path`, or `.semtypes.yml` in the current directory when no path is
/// given. A missing default file yields the defaults; a missing explicit file
/// is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("config file not found: {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    let mut config = parse_config(&contents)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    config.source = Some(config_path);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yml::from_str(contents)?;
    // Reject bad globs at load time rather than mid-walk.
    config.exclude_set()?;
    Ok(config)
}

impl Config {
    /// The file this config was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn def_dir(&self) -> PathBuf {
        self.def_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEF_DIR))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn index_enabled(&self) -> bool {
        self.index.unwrap_or(true)
    }

    pub fn category_order(&self) -> Vec<String> {
        if self.category_order.is_empty() {
            languages::DEFAULT_CATEGORY_ORDER
                .iter()
                .map(|c| c.to_string())
                .collect()
        } else {
            self.category_order.clone()
        }
    }

    pub fn display_name(&self, prefix: &str) -> String {
        self.languages
            .get(prefix)
            .and_then(|o| o.display_name.clone())
            .unwrap_or_else(|| languages::display_name(prefix))
    }

    pub fn category(&self, prefix: &str) -> String {
        self.languages
            .get(prefix)
            .and_then(|o| o.category.clone())
            .unwrap_or_else(|| languages::category(prefix).to_string())
    }

    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob =
                Glob::new(pattern).with_context(|| format!("invalid exclude pattern: {pattern}"))?;
            builder.add(glob);
        }
        builder.build().context("failed to build exclude set")
    }
}
