use brief_heuristics::rules_for;
use brief_protocol::Anchor;

/// Anchor set for a truncated file: head block, optional largest
/// declaration span, tail block. Sorted by start, overlaps merged, so the
/// union always covers line 1 and the last line without double-rendering.
pub fn truncated_anchors(
    lines: &[String],
    language: &str,
    max_lines: usize,
    tail_lines: usize,
    pick_mid: bool,
) -> Vec<Anchor> {
    let total = lines.len();
    if total == 0 {
        return Vec::new();
    }

    let head_end = max_lines.saturating_sub(tail_lines).min(total).max(1);
    let mut anchors = vec![Anchor::new(1, head_end)];

    if pick_mid {
        if let Some(span) = largest_declaration_span(lines, language) {
            anchors.push(span);
        }
    }

    let tail_start = (total + 1).saturating_sub(tail_lines).clamp(1, total);
    anchors.push(Anchor::new(tail_start, total));

    anchors.sort_by_key(|a| (a.start, a.end));
    merge_overlaps(anchors)
}

/// Single anchor for a file rendered whole (still capped at the per-file
/// snippet limit).
pub fn full_anchor(total: usize, max_lines: usize) -> Anchor {
    Anchor::new(1, total.min(max_lines).max(1))
}

/// The largest contiguous span opened by a detected declaration line.
///
/// The span runs to the first blank-line gap after the declaration (or end
/// of file), is widened to at least eight lines past its start, and is
/// clipped to the file. Returns `None` when nothing looks like a
/// declaration.
pub fn largest_declaration_span(lines: &[String], language: &str) -> Option<Anchor> {
    let total = lines.len();
    if total == 0 {
        return None;
    }
    let text = lines.join("\n");

    let mut best: Option<Anchor> = None;
    for pattern in &rules_for(language).declaration_starts {
        for m in pattern.find_iter(&text) {
            let start = text[..m.start()].matches('\n').count() + 1;
            let after = &text[m.end()..];
            let end = match after.find("\n\n") {
                Some(gap) => start + after[..gap].matches('\n').count() + 1,
                None => total,
            };
            let span = Anchor::new(start, end.max(start + 8).min(total));
            if best.map_or(true, |b| span.len() > b.len()) {
                best = Some(span);
            }
        }
    }
    best
}

fn merge_overlaps(sorted: Vec<Anchor>) -> Vec<Anchor> {
    let mut out: Vec<Anchor> = Vec::new();
    for anchor in sorted {
        match out.last_mut() {
            Some(last) if anchor.start <= last.end => {
                last.end = last.end.max(anchor.end);
            }
            _ => out.push(anchor),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_lines(total: usize) -> Vec<String> {
        (1..=total).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn concrete_truncation_case_head_and_tail_only() {
        // 500 lines, snippet budget 180, tail 40, nothing declaration-like.
        let lines = make_lines(500);
        let anchors = truncated_anchors(&lines, "", 180, 40, true);
        assert_eq!(anchors, vec![Anchor::new(1, 140), Anchor::new(461, 500)]);
    }

    #[test]
    fn anchors_cover_first_and_last_line() {
        for total in [1usize, 5, 50, 200, 5000] {
            let lines = make_lines(total);
            let anchors = truncated_anchors(&lines, "", 180, 40, false);
            assert!(!anchors.is_empty());
            assert_eq!(anchors.first().unwrap().start, 1);
            assert_eq!(anchors.last().unwrap().end, total);
            for anchor in &anchors {
                assert!(anchor.start >= 1 && anchor.end <= total);
                assert!(anchor.start <= anchor.end);
            }
            for pair in anchors.windows(2) {
                assert!(pair[1].start > pair[0].end, "overlap in {anchors:?}");
            }
        }
    }

    #[test]
    fn small_file_collapses_to_one_anchor() {
        // head (1..50) and tail (11..50) overlap; they must merge
        let lines = make_lines(50);
        let anchors = truncated_anchors(&lines, "", 180, 40, false);
        assert_eq!(anchors, vec![Anchor::new(1, 50)]);
    }

    #[test]
    fn mid_anchor_picks_the_largest_declaration() {
        let mut lines = make_lines(400);
        lines[199] = "def small():".to_string();
        lines[200] = "    return 1".to_string();
        lines[201] = String::new();
        lines[249] = "def big():".to_string();
        for line in lines.iter_mut().take(290).skip(250) {
            *line = "    work()".to_string();
        }
        lines[290] = String::new();

        let span = largest_declaration_span(&lines, "python").unwrap();
        assert_eq!(span.start, 250);
        assert!(span.len() > 20);

        let anchors = truncated_anchors(&lines, "python", 180, 40, true);
        assert_eq!(anchors.len(), 3);
        assert_eq!(anchors[0], Anchor::new(1, 140));
        assert_eq!(anchors[1].start, 250);
        assert_eq!(anchors.last().unwrap().end, 400);
    }

    #[test]
    fn short_declaration_is_widened() {
        let mut lines = make_lines(100);
        lines[49] = "def tiny():".to_string();
        lines[50] = "    pass".to_string();
        lines[51] = String::new();

        let span = largest_declaration_span(&lines, "python").unwrap();
        assert_eq!(span.start, 50);
        assert_eq!(span.end, 58);
    }

    #[test]
    fn no_declaration_means_no_mid_anchor() {
        let lines = make_lines(300);
        assert_eq!(largest_declaration_span(&lines, "python"), None);
    }

    #[test]
    fn full_anchor_caps_at_snippet_limit() {
        assert_eq!(full_anchor(500, 180), Anchor::new(1, 180));
        assert_eq!(full_anchor(30, 180), Anchor::new(1, 30));
    }

    #[test]
    fn empty_file_yields_no_anchors() {
        assert!(truncated_anchors(&[], "", 180, 40, true).is_empty());
    }
}
