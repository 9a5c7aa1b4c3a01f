use std::collections::{BTreeMap, BTreeSet};

use crate::languages::{DEFAULT_CATEGORY_ORDER, OTHER_CATEGORY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub display_name: String,
    /// File prefix; the page lives at `<prefix>.md`.
    pub prefix: String,
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub category_order: Vec<String>,
    /// Directory named in the footer, e.g. `src/language_configs/`.
    pub def_dir: String,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            category_order: DEFAULT_CATEGORY_ORDER.iter().map(|c| c.to_string()).collect(),
            def_dir: "src/language_configs/".to_string(),
        }
    }
}

/// Render `index.md`. Categories follow `category_order`; categories missing
/// from the order are listed afterwards alphabetically. Languages within a
/// category are sorted by display name.
pub fn render_index(entries: &[IndexEntry], options: &IndexOptions) -> String {
    let mut md: Vec<String> = vec![
        "# Language Node Type Reference".to_string(),
        String::new(),
        "This reference documents the AST node types of every language table,".to_string(),
        "organized by programming language. Each page shows:".to_string(),
        String::new(),
        "- **Node Type**: The tree-sitter node type string".to_string(),
        "- **Semantic Type**: Universal semantic classification".to_string(),
        "- **Name Extraction**: Strategy for extracting identifiers".to_string(),
        "- **Description**: What the node represents".to_string(),
        String::new(),
        "## Languages".to_string(),
        String::new(),
    ];

    let mut by_category: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for entry in entries {
        let category = if entry.category.is_empty() {
            OTHER_CATEGORY
        } else {
            entry.category.as_str()
        };
        by_category
            .entry(category)
            .or_default()
            .push((entry.display_name.as_str(), entry.prefix.as_str()));
    }

    let mut seen = BTreeSet::new();
    let mut ordered: Vec<&str> = options
        .category_order
        .iter()
        .map(String::as_str)
        .filter(|c| by_category.contains_key(c) && seen.insert(*c))
        .collect();
    let extra: Vec<&str> = by_category
        .keys()
        .copied()
        .filter(|c| !ordered.contains(c))
        .collect();
    ordered.extend(extra);

    for category in ordered {
        let Some(languages) = by_category.get_mut(category) else {
            continue;
        };
        languages.sort();
        md.push(format!("### {category}"));
        md.push(String::new());
        for (display_name, prefix) in languages.iter() {
            md.push(format!("- [{display_name}]({prefix}.md)"));
        }
        md.push(String::new());
    }

    md.push("---".to_string());
    md.push(String::new());
    md.push(format!(
        "*This documentation is auto-generated from the `.def` files in `{}`*",
        options.def_dir
    ));
    md.push(String::new());

    md.join("\n")
}
