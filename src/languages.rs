//! Built-in language display names and index categories, keyed by `.def`
//! file prefix (`json_types.def` → `json`).

pub struct LanguageInfo {
    pub prefix: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
}

const fn info(
    prefix: &'static str,
    display_name: &'static str,
    category: &'static str,
) -> LanguageInfo {
    LanguageInfo {
        prefix,
        display_name,
        category,
    }
}

pub static LANGUAGES: &[LanguageInfo] = &[
    info("javascript", "JavaScript", "Web"),
    info("typescript", "TypeScript", "Web"),
    info("html", "HTML", "Web"),
    info("css", "CSS", "Web"),
    info("c", "C", "Systems"),
    info("cpp", "C++", "Systems"),
    info("go", "Go", "Systems"),
    info("rust", "Rust", "Systems"),
    info("zig", "Zig", "Systems"),
    info("python", "Python", "Scripting"),
    info("ruby", "Ruby", "Scripting"),
    info("php", "PHP", "Scripting"),
    info("lua", "Lua", "Scripting"),
    info("r", "R", "Scripting"),
    info("bash", "Bash", "Scripting"),
    info("java", "Java", "Enterprise & Mobile"),
    info("csharp", "C#", "Enterprise & Mobile"),
    info("kotlin", "Kotlin", "Enterprise & Mobile"),
    info("swift", "Swift", "Enterprise & Mobile"),
    info("dart", "Dart", "Enterprise & Mobile"),
    info("scala", "Scala", "Enterprise & Mobile"),
    info("hcl", "HCL (Terraform)", "Infrastructure"),
    info("json", "JSON", "Infrastructure"),
    info("toml", "TOML", "Infrastructure"),
    info("graphql", "GraphQL", "Infrastructure"),
    info("yaml", "YAML", "Infrastructure"),
    info("markdown", "Markdown", "Documentation"),
    info("sql", "SQL", "Documentation"),
    info("fsharp", "F#", "Functional"),
    info("haskell", "Haskell", "Functional"),
    info("julia", "Julia", "Scientific"),
];

pub const OTHER_CATEGORY: &str = "Other";

pub const DEFAULT_CATEGORY_ORDER: &[&str] = &[
    "Web",
    "Systems",
    "Scripting",
    "Enterprise & Mobile",
    "Infrastructure",
    "Documentation",
    "Functional",
    "Scientific",
    OTHER_CATEGORY,
];

pub fn lookup(prefix: &str) -> Option<&'static LanguageInfo> {
    LANGUAGES.iter().find(|l| l.prefix == prefix)
}

/// Display name for a prefix: the built-in name if known, otherwise
/// [`title_name`].
pub fn display_name(prefix: &str) -> String {
    match lookup(prefix) {
        Some(info) => info.display_name.to_string(),
        None => title_name(prefix),
    }
}

/// The prefix with underscores as spaces and each word capitalized
/// (`json` → `Json`, `c_sharp` → `C Sharp`). Page titles use this form.
pub fn title_name(prefix: &str) -> String {
    title_case(&prefix.replace('_', " "))
}

pub fn category(prefix: &str) -> &'static str {
    lookup(prefix).map_or(OTHER_CATEGORY, |info| info.category)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names() {
        assert_eq!(display_name("json"), "JSON");
        assert_eq!(display_name("cpp"), "C++");
        assert_eq!(category("json"), "Infrastructure");
        assert_eq!(category("hcl"), "Infrastructure");
    }

    #[test]
    fn title_names_ignore_the_builtin_table() {
        assert_eq!(title_name("json"), "Json");
        assert_eq!(title_name("cpp"), "Cpp");
        assert_eq!(title_name("c_sharp"), "C Sharp");
    }

    #[test]
    fn fallback_title_case() {
        assert_eq!(display_name("my_lang"), "My Lang");
        assert_eq!(display_name("objc2x"), "Objc2X");
        assert_eq!(category("my_lang"), "Other");
    }

    #[test]
    fn prefixes_unique_and_categories_ordered() {
        let mut prefixes: Vec<&str> = LANGUAGES.iter().map(|l| l.prefix).collect();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), LANGUAGES.len());
        for l in LANGUAGES {
            assert!(DEFAULT_CATEGORY_ORDER.contains(&l.category), "{}", l.prefix);
        }
    }
}
