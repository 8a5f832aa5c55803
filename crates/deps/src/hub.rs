use crate::graph::DepGraph;
use brief_protocol::{DepKind, RepoLink};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Matches rendered graph lines carrying cross-repo kinds.
static PACK_EDGE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^- (.+?) -> (.+?) \((http|queue)\)$").expect("valid pattern literal")
});

/// Cross-repository graph stitched from sibling pack documents.
pub struct HubGraph {
    pub graph: DepGraph,
    /// `pack_uri` values that could not be read.
    pub broken: Vec<String>,
}

impl HubGraph {
    pub fn render(&self) -> String {
        let mut lines = vec!["# HUB GRAPH".to_string()];
        for (source, target, kind) in self.graph.edges() {
            lines.push(format!("- {source} -> {target} ({})", kind.as_str()));
        }
        for uri in &self.broken {
            lines.push(format!("- BROKEN LINK: {uri}"));
        }
        lines.join("\n")
    }
}

/// Read each linked pack and lift its outward-facing (http/queue) edges
/// into one graph, qualified by the sibling repo's name.
pub fn stitch_hub(root: &Path, links: &[RepoLink]) -> HubGraph {
    let mut graph = DepGraph::new();
    let mut broken = Vec::new();

    for link in links {
        let path = root.join(&link.pack_uri);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Unreadable pack link {}: {e}", link.pack_uri);
                broken.push(link.pack_uri.clone());
                continue;
            }
        };
        for caps in PACK_EDGE_LINE.captures_iter(&text) {
            let kind = match &caps[3] {
                "http" => DepKind::Http,
                _ => DepKind::Queue,
            };
            graph.add_edge("this:?", &format!("{}:{}", link.name, &caps[2]), kind);
        }
    }

    HubGraph { graph, broken }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn link(name: &str, uri: &str) -> RepoLink {
        RepoLink {
            name: name.to_string(),
            pack_uri: uri.to_string(),
        }
    }

    #[test]
    fn stitches_http_and_queue_edges_from_linked_packs() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("sibling.md"),
            "## DEPENDENCY GRAPH\n\
             - api.py -> https://svc.test/v1 (http)\n\
             - worker.py -> queue:jobs (queue)\n\
             - a.py -> os (import)\n",
        )
        .unwrap();

        let hub = stitch_hub(temp.path(), &[link("sibling", "sibling.md")]);
        assert!(hub.broken.is_empty());
        let rendered = hub.render();
        assert!(rendered.starts_with("# HUB GRAPH"));
        assert!(rendered.contains("- this:? -> sibling:https://svc.test/v1 (http)"));
        assert!(rendered.contains("- this:? -> sibling:queue:jobs (queue)"));
        // import edges are repo-internal and never stitched
        assert!(!rendered.contains("(import)"));
    }

    #[test]
    fn missing_link_is_reported_broken() {
        let temp = tempdir().unwrap();
        let hub = stitch_hub(temp.path(), &[link("ghost", "nope/PACK.md")]);
        assert_eq!(hub.broken, vec!["nope/PACK.md".to_string()]);
        assert!(hub.render().contains("- BROKEN LINK: nope/PACK.md"));
    }
}
