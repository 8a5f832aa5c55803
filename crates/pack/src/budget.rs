use brief_protocol::{approx_tokens, PackedEntry};

/// One greedy left-to-right pass over the entries in traversal order.
///
/// The first entry that would push the running total past the budget is
/// marked truncated, and so is every entry after it. No repacking or
/// reordering: directory enumeration order decides which files survive
/// intact. Returns whether any truncation occurred.
pub fn enforce_budget(entries: &mut [PackedEntry], token_limit: u64) -> bool {
    let mut used = 0u64;
    let mut overflowed = false;
    for entry in entries.iter_mut() {
        let estimate = approx_tokens(entry.char_count());
        if !overflowed && used + estimate <= token_limit {
            used += estimate;
            continue;
        }
        overflowed = true;
        entry.truncated = true;
    }
    if overflowed {
        log::debug!("Budget pass overflowed at {used} of {token_limit} tokens");
    }
    overflowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(path: &str, chars: usize) -> PackedEntry {
        // one line of `chars` characters => estimate = max(1, chars / 4)
        PackedEntry::new(path.to_string(), String::new(), vec!["x".repeat(chars)])
    }

    fn truncated_count(entries: &[PackedEntry]) -> usize {
        entries.iter().filter(|e| e.truncated).count()
    }

    #[test]
    fn under_budget_marks_nothing() {
        let mut entries = vec![entry("a", 400), entry("b", 400)];
        assert!(!enforce_budget(&mut entries, 200));
        assert_eq!(truncated_count(&entries), 0);
    }

    #[test]
    fn first_overflow_and_everything_after_is_marked() {
        let mut entries = vec![
            entry("a", 400), // 100 tokens
            entry("b", 400), // 100 tokens, overflows a 150 budget
            entry("c", 4),   // would fit alone, still truncated
        ];
        assert!(enforce_budget(&mut entries, 150));
        assert!(!entries[0].truncated);
        assert!(entries[1].truncated);
        assert!(entries[2].truncated);
    }

    #[test]
    fn budget_is_monotonic_in_the_limit() {
        let sizes = [400usize, 120, 4000, 40, 800];
        let mut previous = usize::MAX;
        for limit in [0u64, 50, 100, 500, 2000] {
            let mut entries: Vec<_> = sizes
                .iter()
                .enumerate()
                .map(|(i, chars)| entry(&format!("f{i}"), *chars))
                .collect();
            enforce_budget(&mut entries, limit);
            let count = truncated_count(&entries);
            assert!(
                count <= previous,
                "raising the budget to {limit} increased truncations"
            );
            previous = count;
        }
    }

    #[test]
    fn empty_file_still_costs_one_token() {
        let mut entries = vec![PackedEntry::new(
            "empty".to_string(),
            String::new(),
            Vec::new(),
        )];
        assert!(enforce_budget(&mut entries, 0));
        assert!(entries[0].truncated);
    }
}
