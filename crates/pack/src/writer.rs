use crate::anchors::{full_anchor, truncated_anchors};
use crate::error::Result;
use brief_deps::DepGraph;
use brief_protocol::{Anchor, PackTotals, PackedEntry, RepoLink, OUTPUT_DIR};
use std::path::{Path, PathBuf};

pub const PACK_FILE: &str = "PACK.md";

/// Everything the writer needs to render one pack document.
pub struct PackInput<'a> {
    pub entries: &'a [PackedEntry],
    pub graph: &'a DepGraph,
    pub include_graph: bool,
    pub totals: &'a PackTotals,
    pub truncated: bool,
    pub token_limit: u64,
    pub encoder: &'a str,
    pub limiter: &'a str,
    pub branch: &'a str,
    pub commit: &'a str,
    pub links: &'a [RepoLink],
    pub snippet_lines: usize,
    pub tail_lines: usize,
    pub pick_mid_block: bool,
}

/// Render the full pack document with its fixed section grammar:
/// header, summary, optional dependency graph, files, metrics, notes.
pub fn render_pack(input: &PackInput) -> String {
    let mut md = Vec::new();
    emit_front_matter(&mut md, input);

    md.push("# PACK".to_string());
    md.push(String::new());
    md.push("## SUMMARY".to_string());
    md.push(format!("- Files packed: {}", input.totals.files_packed));
    md.push(format!("- Tokens (approx): {}", input.totals.tokens_total));
    md.push(format!(
        "- Truncated: {}",
        if input.truncated { "yes" } else { "no" }
    ));
    md.push(
        "- Policy: no_code_edits=true; abstention=\"Correct > Abstain >> Confidently wrong\""
            .to_string(),
    );
    md.push(String::new());

    if input.include_graph {
        emit_dependency_graph(&mut md, input.graph);
    }

    md.push("## FILES".to_string());
    for entry in input.entries {
        emit_file_section(&mut md, entry, input);
    }

    emit_metrics(&mut md, input);

    md.push("## NOTES".to_string());
    md.push("- Use the pack as the context of truth.".to_string());
    md.push("- Re-run `repobrief run` after meaningful code changes.".to_string());
    md.push(String::new());

    md.join("\n")
}

/// Location of the pack document under the repo root.
pub fn pack_path(root: &Path) -> PathBuf {
    root.join(OUTPUT_DIR).join("pack").join(PACK_FILE)
}

/// Write (fully overwrite) the pack document, creating parent directories.
pub fn write_pack(root: &Path, content: &str) -> Result<PathBuf> {
    let path = pack_path(root);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;
    log::info!("Wrote pack to {}", path.display());
    Ok(path)
}

fn emit_front_matter(md: &mut Vec<String>, input: &PackInput) {
    md.push("---".to_string());
    md.push(format!("version: {}", brief_protocol::PACK_FORMAT_VERSION));
    md.push(format!("generated: {}", input.totals.generated));
    md.push(format!("encoder: {}", input.encoder));
    md.push(format!("token_limit: {}", input.token_limit));
    md.push(format!(
        "limiter: {}",
        if input.truncated {
            "truncated"
        } else {
            input.limiter
        }
    ));
    md.push(format!("branch: {}", input.branch));
    md.push(format!("commit: {}", input.commit));
    if !input.links.is_empty() {
        md.push("links:".to_string());
        for RepoLink { name, pack_uri } in input.links {
            md.push(format!("  - name: {name}"));
            md.push(format!("    pack_uri: {pack_uri}"));
        }
    }
    md.push("---".to_string());
    md.push(String::new());
}

fn emit_dependency_graph(md: &mut Vec<String>, graph: &DepGraph) {
    md.push("## DEPENDENCY GRAPH".to_string());
    md.push("(import|call|async_call|http|db|queue)".to_string());
    for (source, target, kind) in graph.edges() {
        md.push(format!("- {source} -> {target} ({})", kind.as_str()));
    }
    md.push(String::new());
}

fn emit_file_section(md: &mut Vec<String>, entry: &PackedEntry, input: &PackInput) {
    let candidate = &entry.candidate;
    md.push(format!(
        "### FILE path={} lang={}",
        candidate.path, candidate.language
    ));
    md.push("#### ANCHORS".to_string());

    let anchors = if entry.truncated {
        truncated_anchors(
            &entry.lines,
            &candidate.language,
            input.snippet_lines,
            input.tail_lines,
            input.pick_mid_block,
        )
    } else if entry.lines.is_empty() {
        Vec::new()
    } else {
        vec![full_anchor(entry.lines.len(), input.snippet_lines)]
    };

    for anchor in &anchors {
        md.push(format!("- L{}-L{}", anchor.start, anchor.end));
    }
    md.push(String::new());
    for anchor in &anchors {
        emit_fence(md, &candidate.language, *anchor, &entry.lines);
    }
}

fn emit_fence(md: &mut Vec<String>, language: &str, anchor: Anchor, lines: &[String]) {
    let Anchor { start, end } = anchor;
    md.push(format!("#### CODE L{start}-L{end}"));
    md.push(format!("```{language}"));
    md.push(format!("# L{start}-L{end}"));
    md.push(lines[start - 1..end].join("\n"));
    md.push("```".to_string());
    md.push(String::new());
}

fn emit_metrics(md: &mut Vec<String>, input: &PackInput) {
    let totals = input.totals;
    md.push("## METRICS".to_string());
    md.push(format!("- files_packed: {}", totals.files_packed));
    md.push(format!("- tokens_total: {}", totals.tokens_total));
    md.push(format!("- duration_ms: {}", totals.duration_ms));
    md.push(format!(
        "- truncation_reason: {}",
        if input.truncated { "over_budget" } else { "none" }
    ));
    md.push(format!("- dep_missing (warn): {}", totals.dep_missing));
    if let Some(fresh) = totals.fresh {
        md.push(format!(
            "- fresh_since_last_commit: {}",
            if fresh { "yes" } else { "no" }
        ));
    }
    md.push(String::new());
}
