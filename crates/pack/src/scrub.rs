use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed scrub patterns: a credential-ish label followed by `:` or `=` and
/// a value. Best-effort only; this is not secret detection.
static SCRUB_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(api[_-]?key)\s*[:=]\s*\S+",
        r"(?i)(secret)\s*[:=]\s*\S+",
        r"(?i)(token)\s*[:=]\s*\S+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid pattern literal"))
    .collect()
});

/// Rewrite credential-looking assignments to `<label>: [REDACTED]`.
///
/// Runs before any other processing touches file text. Idempotent:
/// scrubbing already-scrubbed text changes nothing.
pub fn scrub_secrets(text: &str) -> String {
    let mut out = text.to_string();
    for pattern in SCRUB_PATTERNS.iter() {
        out = pattern.replace_all(&out, "${1}: [REDACTED]").into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_are_kept_and_values_redacted() {
        let scrubbed = scrub_secrets("API_KEY=abc123\npassword: hunter2\ntoken : xyz\n");
        assert_eq!(
            scrubbed,
            "API_KEY: [REDACTED]\npassword: hunter2\ntoken: [REDACTED]\n"
        );
    }

    #[test]
    fn scrub_is_idempotent() {
        let once = scrub_secrets("secret = s3cr3t value\napi-key: aaaa\n");
        let twice = scrub_secrets(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn plain_text_is_untouched() {
        let text = "just code\nlet x = 1;\n";
        assert_eq!(scrub_secrets(text), text);
    }
}
