use once_cell::sync::Lazy;
use regex::Regex;

/// Heuristic patterns for one language family.
///
/// `declaration_starts` match lines that open a top-level declaration (used
/// by the anchor selector to pick a mid excerpt); `import_patterns` capture
/// the raw import target in group 1 (used by the dependency extractor).
pub struct LanguageRules {
    languages: &'static [&'static str],
    pub declaration_starts: Vec<Regex>,
    pub import_patterns: Vec<Regex>,
}

fn rx(source: &str) -> Regex {
    // table entries are fixed literals
    Regex::new(source).expect("valid pattern literal")
}

static RULES: Lazy<Vec<LanguageRules>> = Lazy::new(|| {
    vec![
        LanguageRules {
            languages: &["python"],
            declaration_starts: vec![rx(r"(?m)^(?:async\s+)?def\s+[A-Za-z0-9_]+"), rx(r"(?m)^class\s+[A-Za-z0-9_]+")],
            import_patterns: vec![
                rx(r"(?m)^\s*from\s+([\w.\-/@]+)\s+import\b"),
                rx(r"(?m)^\s*import\s+([\w.\-/@]+)"),
            ],
        },
        LanguageRules {
            languages: &["javascript", "typescript", "tsx"],
            declaration_starts: vec![
                rx(r"(?m)^(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s+[A-Za-z0-9_]+"),
                rx(r"(?m)^(?:export\s+)?class\s+[A-Za-z0-9_]+"),
            ],
            import_patterns: vec![
                rx(r"(?m)^\s*import\s+([\w.\-/@]+)"),
                rx(r#"(?m)^\s*import\s+\{?[ \w,]*\}?\s*from\s*['"]([\w.\-/@]+)['"]"#),
            ],
        },
        LanguageRules {
            languages: &["rust"],
            declaration_starts: vec![
                rx(r"(?m)^(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+[A-Za-z0-9_]+"),
                rx(r"(?m)^(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|trait|mod)\s+[A-Za-z0-9_]+"),
                rx(r"(?m)^impl\b"),
            ],
            import_patterns: vec![rx(r"(?m)^\s*use\s+([A-Za-z0-9_:]+)")],
        },
        // Fallback row: applies to every language without a row of its own,
        // including files with no recognized extension.
        LanguageRules {
            languages: &[],
            declaration_starts: vec![rx(
                r"(?m)^(def|class|function|export\s+function)\s+[A-Za-z0-9_]+",
            )],
            import_patterns: vec![
                rx(r"(?m)^\s*from\s+([\w.\-/@]+)\s+import\b"),
                rx(r"(?m)^\s*import\s+([\w.\-/@]+)"),
                rx(r#"(?m)^\s*import\s+\{?[ \w,]*\}?\s*from\s*['"]([\w.\-/@]+)['"]"#),
            ],
        },
    ]
});

/// Rules for a language label (as produced by [`crate::Language::as_str`]);
/// falls back to the generic row.
pub fn rules_for(language: &str) -> &'static LanguageRules {
    RULES
        .iter()
        .find(|rules| rules.languages.iter().any(|l| *l == language))
        .unwrap_or_else(|| RULES.last().expect("rules table is non-empty"))
}

/// Bare URL literal anywhere in the text.
pub static URL_PATTERN: Lazy<Regex> = Lazy::new(|| rx(r#"https?://[^\s'"]+"#));

/// SQL-ish keyword presence; one hit anywhere marks the file as touching a
/// database.
pub static SQL_KEYWORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| rx(r"(?i)\b(select|insert|update|delete|from)\b"));

/// Queue verb with a string-literal first argument; group 2 is the target.
pub static QUEUE_CALL_PATTERN: Lazy<Regex> =
    Lazy::new(|| rx(r#"\b(publish|enqueue|send|emit|produce)\s*\(\s*["']([\w\-:./]+)["']"#));

/// Any bare function-call token; group 1 is the symbol name.
pub static BARE_CALL_PATTERN: Lazy<Regex> =
    Lazy::new(|| rx(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\("));

/// A call preceded by an async-wait keyword; group 1 is the symbol name.
pub static ASYNC_CALL_PATTERN: Lazy<Regex> =
    Lazy::new(|| rx(r"\bawait\s+([A-Za-z_][A-Za-z0-9_]*)\s*\("));
