use crate::command::RunStatus;
use crate::context::RunContext;
use crate::{facts, guard, plan};
use anyhow::{Context as AnyhowContext, Result};
use brief_deps::{check_sanity, extract_edges, DepGraph};
use brief_heuristics::Language;
use brief_pack::{
    enforce_budget, evaluate_freshness, now_timestamp, render_pack, scrub_secrets, write_pack,
    PackInput,
};
use brief_protocol::{approx_tokens, PackTotals, PackedEntry, SanityMode};
use brief_scope::ScopeResolver;
use std::time::Instant;

/// One full pipeline invocation: scope, extract, budget, check, write,
/// guard. The pack is always written before gates are evaluated (the
/// consumer gets context even on a failing run), with one exception:
/// abstention with `abstain_writes_pack: false`.
pub fn execute(ctx: &RunContext) -> Result<RunStatus> {
    let started = Instant::now();
    let config = &ctx.config;

    let missing_facts = facts::verify(&ctx.root, &config.rare_facts);
    let abstained = !missing_facts.is_empty();
    if abstained {
        let joined = missing_facts.join(", ");
        log::warn!("Abstaining: missing rare facts: {joined}");
        plan::append(
            &ctx.root,
            &[
                "## QUESTIONS".to_string(),
                format!("- Missing rare facts: {joined}"),
                "Stopping.".to_string(),
            ],
        )?;
        if !config.pack.abstain_writes_pack {
            return Ok(RunStatus::Abstained);
        }
    }

    let scope = ScopeResolver::new(&ctx.root, &config.scope.allow, &config.scope.deny)?;
    let files = scope.resolve();

    let kinds = &config.pack.dependency_kinds;
    let mut entries: Vec<PackedEntry> = Vec::new();
    let mut edges = Vec::new();
    let mut total_chars = 0usize;
    for rel in &files {
        let Ok(bytes) = std::fs::read(ctx.root.join(rel)) else {
            continue;
        };
        let mut text = String::from_utf8_lossy(&bytes).into_owned();
        if config.pack.secret_scrub {
            text = scrub_secrets(&text);
        }
        let language = Language::from_path(rel).as_str().to_string();
        if !kinds.is_empty() {
            edges.extend(extract_edges(rel, &language, &text, kinds));
        }
        let entry = PackedEntry::new(rel.clone(), language, lines_of(&text));
        total_chars += entry.char_count();
        entries.push(entry);
    }

    let token_limit = config.budgets.token_limit;
    let tokens_total = approx_tokens(total_chars);
    // per-entry pass, plus the defensive whole-corpus check
    let truncated = enforce_budget(&mut entries, token_limit) || tokens_total > token_limit;

    let report = check_sanity(
        &ctx.root,
        &edges,
        config.deps.sanity_mode,
        &config.deps.ignore_targets,
        &config.deps.path_aliases,
    );

    let generated = now_timestamp();
    let fresh = config.evals.pack_freshness.then(|| {
        let epochs: Vec<i64> = files
            .iter()
            .map(|rel| brief_vcs::last_commit_epoch(&ctx.root, rel))
            .collect();
        evaluate_freshness(&generated, &epochs, config.evals.freshness_on_parse_error)
    });

    let totals = PackTotals {
        generated,
        files_packed: entries.len(),
        tokens_total,
        duration_ms: started.elapsed().as_millis() as u64,
        dep_missing: report.missing.len(),
        fresh,
    };

    let (branch, commit) = brief_vcs::branch_and_commit(&ctx.root);
    let graph = DepGraph::from_edges(&edges);
    let document = render_pack(&PackInput {
        entries: &entries,
        graph: &graph,
        include_graph: config.pack.dependencies,
        totals: &totals,
        truncated,
        token_limit,
        encoder: &config.budgets.encoder,
        limiter: &config.budgets.limiter,
        branch: &branch,
        commit: &commit,
        links: &config.links.repos,
        snippet_lines: config.pack.per_file_snippet_lines,
        tail_lines: config.pack.tail_lines_on_truncate,
        pick_mid_block: config.pack.mid_block_pick.is_some(),
    });
    let pack_file = write_pack(&ctx.root, &document).context("writing pack document")?;

    let coverage = report.coverage();
    if coverage < config.evals.human_review_if_coverage_below {
        plan::append(
            &ctx.root,
            &[
                "## QUESTIONS".to_string(),
                format!(
                    "- Dependency resolution coverage {coverage:.2} is below {:.2}; human review requested.",
                    config.evals.human_review_if_coverage_below
                ),
            ],
        )?;
    }

    let fresh_label = totals.fresh.map_or("n/a", |f| if f { "yes" } else { "no" });
    plan::append(
        &ctx.root,
        &[
            "## PROGRESS".to_string(),
            format!(
                "- files: {}, deps: {}, dep_missing: {}, fresh: {fresh_label}",
                entries.len(),
                edges.len(),
                report.missing.len()
            ),
            format!(
                "- truncated: {truncated}, tokens_total: {}, duration_ms: {}",
                totals.tokens_total, totals.duration_ms
            ),
            format!("- wrote: {}", pack_file.display()),
            String::new(),
        ],
    )?;

    // Guard first: it can fail the run no matter what else happened.
    let outside = guard::violations(&ctx.root);
    if !outside.is_empty() {
        let preview: Vec<_> = outside.iter().take(5).collect();
        log::error!("Guard violation, source files modified: {preview:?}");
        return Ok(RunStatus::GateFailed);
    }

    if abstained {
        return Ok(RunStatus::Abstained);
    }

    let fresh_ok = totals.fresh.unwrap_or(true);
    if config.deps.sanity_mode == SanityMode::Strict && (!report.ok || !fresh_ok) {
        log::error!(
            "Gate failed: dep_missing={}, fresh={fresh_ok}",
            report.missing.len()
        );
        return Ok(RunStatus::GateFailed);
    }

    log::info!(
        "Packed {} files (~{} tokens) in {}ms",
        totals.files_packed,
        totals.tokens_total,
        totals.duration_ms
    );
    Ok(RunStatus::Success)
}

fn lines_of(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
