use brief_protocol::{AliasRule, DependencyEdge, SanityMode};
use regex::Regex;
use std::path::Path;

/// Suffixes tried when mapping an import-like target to files on disk:
/// direct source-file endings plus package-index forms per supported
/// language.
const SOURCE_SUFFIXES: &[&str] = &[
    ".py", ".ts", ".tsx", ".js", ".cpp", ".hpp", ".cc", ".cxx", ".c", ".h", ".cu", ".rs", ".go",
];
const INDEX_SUFFIXES: &[&str] = &[
    "/__init__.py",
    "/index.ts",
    "/index.tsx",
    "/index.js",
    "/mod.rs",
];

/// Outcome of the dependency sanity pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SanityReport {
    /// False only in strict mode with unresolved targets.
    pub ok: bool,
    pub missing: Vec<DependencyEdge>,
    /// Number of internal targets actually probed against disk.
    pub internal_total: usize,
}

impl SanityReport {
    fn passed() -> Self {
        Self {
            ok: true,
            missing: Vec::new(),
            internal_total: 0,
        }
    }

    /// Resolved fraction of probed internal targets; vacuously 1.0.
    pub fn coverage(&self) -> f64 {
        if self.internal_total == 0 {
            return 1.0;
        }
        let resolved = self.internal_total - self.missing.len();
        resolved as f64 / self.internal_total as f64
    }
}

/// Resolve every internal edge target to candidate filesystem paths and
/// report the ones that match nothing on disk.
///
/// External kinds (http/db/queue) and `<symbol:…>` placeholders pass
/// unconditionally. Targets matching an ignore pattern are dropped
/// silently. Never raises; the graph is advisory.
pub fn check_sanity(
    root: &Path,
    edges: &[DependencyEdge],
    mode: SanityMode,
    ignore_targets: &[String],
    aliases: &[AliasRule],
) -> SanityReport {
    if mode == SanityMode::Off {
        return SanityReport::passed();
    }

    let ignores = compile_patterns(ignore_targets);
    let aliases = compile_aliases(aliases);

    let mut missing = Vec::new();
    let mut internal_total = 0usize;
    for edge in edges {
        if edge.kind.is_external() || is_symbolic(&edge.target) {
            continue;
        }
        if ignores.iter().any(|rx| rx.is_match(&edge.target)) {
            continue;
        }
        internal_total += 1;
        let candidates = expand_candidates(&apply_aliases(&edge.target, &aliases));
        let exists = candidates.iter().any(|c| root.join(c).exists());
        if !exists {
            missing.push(edge.clone());
        }
    }

    let ok = mode != SanityMode::Strict || missing.is_empty();
    SanityReport {
        ok,
        missing,
        internal_total,
    }
}

fn is_symbolic(target: &str) -> bool {
    target.starts_with("<symbol:")
}

fn compile_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(rx) => Some(rx),
            Err(e) => {
                log::warn!("Skipping invalid ignore_targets pattern {p:?}: {e}");
                None
            }
        })
        .collect()
}

struct CompiledAlias {
    from: Regex,
    to: String,
}

fn compile_aliases(rules: &[AliasRule]) -> Vec<CompiledAlias> {
    rules
        .iter()
        .filter_map(|rule| match Regex::new(&rule.from) {
            Ok(from) => Some(CompiledAlias {
                from,
                to: rule.to.clone(),
            }),
            Err(e) => {
                log::warn!("Skipping invalid path_aliases rule {:?}: {e}", rule.from);
                None
            }
        })
        .collect()
}

/// Rewrite a target through every matching alias rule (`$1`-style capture
/// substitution). When no rule matches, the target passes through
/// unchanged.
fn apply_aliases(target: &str, rules: &[CompiledAlias]) -> Vec<String> {
    let mut out = Vec::new();
    for rule in rules {
        if rule.from.is_match(target) {
            out.push(rule.from.replace_all(target, rule.to.as_str()).into_owned());
        }
    }
    if out.is_empty() {
        out.push(target.to_string());
    }
    out
}

/// Expand rewritten targets into plausible filesystem forms, order
/// preserved, duplicates dropped.
fn expand_candidates(candidates: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for candidate in candidates {
        let trimmed = candidate.trim_matches(['/', '.']);
        if trimmed.is_empty() || trimmed.starts_with("http") {
            continue;
        }
        push_unique(&mut out, trimmed.to_string());
        for suffix in SOURCE_SUFFIXES {
            push_unique(&mut out, format!("{trimmed}{suffix}"));
        }
        for suffix in INDEX_SUFFIXES {
            push_unique(&mut out, format!("{trimmed}{suffix}"));
        }
    }
    out
}

fn push_unique(out: &mut Vec<String>, value: String) {
    if !out.contains(&value) {
        out.push(value);
    }
}
