use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Convention,
    Warning,
    Error,
}

impl Severity {
    pub fn letter(&self) -> char {
        match self {
            Severity::Convention => 'C',
            Severity::Warning => 'W',
            Severity::Error => 'E',
        }
    }

    /// Accepts full names (any case) or the single-letter form.
    pub fn from_str(s: &str) -> Option<Severity> {
        match s.to_lowercase().as_str() {
            "convention" | "c" => Some(Severity::Convention),
            "warning" | "w" => Some(Severity::Warning),
            "error" | "e" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Location {
    /// 1-indexed line number
    pub line: usize,
    /// 0-indexed column (character offset within the line)
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: String,
    pub location: Location,
    pub severity: Severity,
    pub check_name: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        path: &str,
        location: Location,
        severity: Severity,
        check_name: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.to_string(),
            location,
            severity,
            check_name: check_name.to_string(),
            message: message.into(),
        }
    }

    pub fn sort_key(&self) -> (&str, usize, usize) {
        (&self.path, self.location.line, self.location.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}: {}",
            self.path,
            self.location.line,
            self.location.column,
            self.severity,
            self.check_name,
            self.message,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(path: &str, line: usize) -> Diagnostic {
        Diagnostic::new(
            path,
            Location { line, column: 0 },
            Severity::Convention,
            "Def/X",
            "m",
        )
    }

    #[test]
    fn severity_letters() {
        assert_eq!(Severity::Convention.letter(), 'C');
        assert_eq!(Severity::Warning.letter(), 'W');
        assert_eq!(Severity::Error.letter(), 'E');
    }

    #[test]
    fn severity_from_str() {
        assert_eq!(Severity::from_str("convention"), Some(Severity::Convention));
        assert_eq!(Severity::from_str("Warning"), Some(Severity::Warning));
        assert_eq!(Severity::from_str("ERROR"), Some(Severity::Error));
        assert_eq!(Severity::from_str("W"), Some(Severity::Warning));
        assert_eq!(Severity::from_str("fatal"), None);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Convention < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::new(
            "json_types.def",
            Location { line: 3, column: 5 },
            Severity::Error,
            "Def/UnknownSemanticType",
            "unknown semantic type `LITERAL_BOGUS`",
        );
        assert_eq!(
            format!("{d}"),
            "json_types.def:3:5: E: Def/UnknownSemanticType: unknown semantic type `LITERAL_BOGUS`"
        );
    }

    #[test]
    fn diagnostic_sort_key() {
        let d1 = diag("a.def", 1);
        let d2 = diag("a.def", 2);
        let d3 = diag("b.def", 1);
        assert!(d1.sort_key() < d2.sort_key());
        assert!(d2.sort_key() < d3.sort_key());
    }
}
