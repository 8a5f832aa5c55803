use brief_protocol::FreshnessParsePolicy;
use chrono::{DateTime, Utc};

/// ISO-8601 UTC timestamp at second precision, e.g. `2026-08-06T12:00:00Z`.
pub fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// A pack is fresh iff it was generated at or after the newest commit
/// touching any packed file (non-strict inequality).
///
/// Lookup failures upstream contribute epoch 0 and never block freshness.
/// An unparseable generation timestamp resolves per `on_parse_error`.
pub fn evaluate_freshness(
    generated: &str,
    commit_epochs: &[i64],
    on_parse_error: FreshnessParsePolicy,
) -> bool {
    let generated_epoch = match DateTime::parse_from_rfc3339(generated) {
        Ok(parsed) => parsed.timestamp(),
        Err(e) => {
            log::warn!("Unparseable pack timestamp {generated:?}: {e}");
            return matches!(on_parse_error, FreshnessParsePolicy::Fresh);
        }
    };
    let last_touch = commit_epochs.iter().copied().max().unwrap_or(0);
    generated_epoch >= last_touch
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATED: &str = "2026-08-06T12:00:00Z";
    const GENERATED_EPOCH: i64 = 1_786_017_600;

    #[test]
    fn newer_commit_makes_the_pack_stale() {
        assert!(!evaluate_freshness(
            GENERATED,
            &[GENERATED_EPOCH + 1],
            FreshnessParsePolicy::Stale,
        ));
    }

    #[test]
    fn exact_boundary_is_fresh() {
        assert!(evaluate_freshness(
            GENERATED,
            &[GENERATED_EPOCH],
            FreshnessParsePolicy::Stale,
        ));
    }

    #[test]
    fn no_commit_info_never_blocks() {
        assert!(evaluate_freshness(GENERATED, &[], FreshnessParsePolicy::Stale));
        assert!(evaluate_freshness(GENERATED, &[0, 0], FreshnessParsePolicy::Stale));
    }

    #[test]
    fn parse_failure_follows_policy() {
        assert!(!evaluate_freshness(
            "not-a-timestamp",
            &[],
            FreshnessParsePolicy::Stale,
        ));
        assert!(evaluate_freshness(
            "not-a-timestamp",
            &[],
            FreshnessParsePolicy::Fresh,
        ));
    }

    #[test]
    fn generated_format_round_trips() {
        let now = now_timestamp();
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
