use brief_heuristics::{
    rules_for, ASYNC_CALL_PATTERN, BARE_CALL_PATTERN, QUEUE_CALL_PATTERN, SQL_KEYWORD_PATTERN,
    URL_PATTERN,
};
use brief_protocol::{DepKind, DependencyEdge};

/// Run the enabled pattern passes over one file's text.
///
/// Passes are independent and purely regex-level; false positives and
/// negatives are expected. Edge order follows pass order, then match order
/// within each pass.
pub fn extract_edges(
    path: &str,
    language: &str,
    text: &str,
    kinds: &[DepKind],
) -> Vec<DependencyEdge> {
    let mut edges = Vec::new();

    if kinds.contains(&DepKind::Import) {
        for pattern in &rules_for(language).import_patterns {
            for caps in pattern.captures_iter(text) {
                edges.push(DependencyEdge::new(path, &caps[1], DepKind::Import));
            }
        }
    }

    if kinds.contains(&DepKind::Http) {
        for m in URL_PATTERN.find_iter(text) {
            edges.push(DependencyEdge::new(path, m.as_str(), DepKind::Http));
        }
    }

    if kinds.contains(&DepKind::Db) && SQL_KEYWORD_PATTERN.is_match(text) {
        edges.push(DependencyEdge::new(path, "db:<unknown>", DepKind::Db));
    }

    if kinds.contains(&DepKind::Queue) {
        for caps in QUEUE_CALL_PATTERN.captures_iter(text) {
            edges.push(DependencyEdge::new(
                path,
                format!("queue:{}", &caps[2]),
                DepKind::Queue,
            ));
        }
    }

    // Symbolic kinds: placeholder targets, never resolved against disk.
    if kinds.contains(&DepKind::Call) {
        for caps in BARE_CALL_PATTERN.captures_iter(text) {
            edges.push(DependencyEdge::new(
                path,
                format!("<symbol:{}>", &caps[1]),
                DepKind::Call,
            ));
        }
    }

    if kinds.contains(&DepKind::AsyncCall) {
        for caps in ASYNC_CALL_PATTERN.captures_iter(text) {
            edges.push(DependencyEdge::new(
                path,
                format!("<symbol:{}>", &caps[1]),
                DepKind::AsyncCall,
            ));
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn targets(edges: &[DependencyEdge], kind: DepKind) -> Vec<&str> {
        edges
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.target.as_str())
            .collect()
    }

    #[test]
    fn disabled_kinds_produce_nothing() {
        let text = "import os\nhttps://example.com\nselect * from t\n";
        assert!(extract_edges("a.py", "python", text, &[]).is_empty());
    }

    #[test]
    fn python_imports_are_extracted_in_order() {
        let text = "from pkg.mod import thing\nimport os\nimport sys\n";
        let edges = extract_edges("a.py", "python", text, &[DepKind::Import]);
        assert_eq!(
            targets(&edges, DepKind::Import),
            vec!["pkg.mod", "os", "sys"]
        );
        assert!(edges.iter().all(|e| e.source == "a.py"));
    }

    #[test]
    fn js_import_emits_both_binding_and_module() {
        let text = "import foo from 'bar'\n";
        let edges = extract_edges("a.js", "javascript", text, &[DepKind::Import]);
        assert_eq!(targets(&edges, DepKind::Import), vec!["foo", "bar"]);
    }

    #[test]
    fn http_edges_capture_bare_urls() {
        let text = "fetch(\"https://api.example.com/v1/items\")\n";
        let edges = extract_edges("a.ts", "typescript", text, &[DepKind::Http]);
        assert_eq!(
            targets(&edges, DepKind::Http),
            vec!["https://api.example.com/v1/items"]
        );
    }

    #[test]
    fn db_emits_one_synthetic_edge() {
        let text = "q = \"SELECT id FROM users\"\nr = \"select name from t\"\n";
        let edges = extract_edges("a.py", "python", text, &[DepKind::Db]);
        assert_eq!(targets(&edges, DepKind::Db), vec!["db:<unknown>"]);
    }

    #[test]
    fn queue_edges_use_literal_targets() {
        let text = "bus.publish(\"orders:created\", x)\nenqueue('jobs/nightly')\n";
        let edges = extract_edges("a.py", "python", text, &[DepKind::Queue]);
        assert_eq!(
            targets(&edges, DepKind::Queue),
            vec!["queue:orders:created", "queue:jobs/nightly"]
        );
    }

    #[test]
    fn symbolic_calls_use_placeholder_targets() {
        let text = "result = compute(x)\nvalue = await fetch_data()\n";
        let edges = extract_edges(
            "a.py",
            "python",
            text,
            &[DepKind::Call, DepKind::AsyncCall],
        );
        assert!(targets(&edges, DepKind::Call).contains(&"<symbol:compute>"));
        assert_eq!(
            targets(&edges, DepKind::AsyncCall),
            vec!["<symbol:fetch_data>"]
        );
    }

    #[test]
    fn rust_use_statements_are_imports() {
        let text = "use std::fs;\nuse crate::graph::DepGraph;\n";
        let edges = extract_edges("a.rs", "rust", text, &[DepKind::Import]);
        assert_eq!(
            targets(&edges, DepKind::Import),
            vec!["std::fs", "crate::graph::DepGraph"]
        );
    }
}
