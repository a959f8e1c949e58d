//! Numeric identifier safeguard.
//!
//! Broadcasts that carry several numeric identifiers at once get tagged by
//! the receiving chat. When a would-be message crosses the threshold, the
//! generator switches to name-based and count-based renderings.

/// Count runs of two or more ASCII digits in `text`.
///
/// `"SCP-173, SCP-049 and 7"` has two numeric tokens.
pub fn count_numeric_tokens(text: &str) -> usize {
    let mut count = 0;
    let mut run = 0usize;

    for c in text.chars() {
        if c.is_ascii_digit() {
            run += 1;
            if run == 2 {
                count += 1;
            }
        } else {
            run = 0;
        }
    }

    count
}

/// Decides whether a generation runs in number-free mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericGuard {
    threshold: usize,
}

impl NumericGuard {
    /// Create a guard; a threshold of zero never trips.
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Check a probe message built from the most numeric renderings.
    pub fn trips(&self, probe: &str) -> bool {
        self.threshold > 0 && count_numeric_tokens(probe) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_numeric_tokens() {
        assert_eq!(count_numeric_tokens(""), 0);
        assert_eq!(count_numeric_tokens("no digits here"), 0);
        assert_eq!(count_numeric_tokens("Class-D 7"), 0);
        assert_eq!(count_numeric_tokens("SCP-173"), 1);
        assert_eq!(count_numeric_tokens("SCP-173, SCP-049, 2006"), 3);
        assert_eq!(count_numeric_tokens("08a09"), 2);
    }

    #[test]
    fn test_guard_threshold() {
        let guard = NumericGuard::new(3);
        assert!(!guard.trips("SCP-076 and SCP-610"));
        assert!(guard.trips("SCP-076, SCP-610 and SCP-323"));
    }

    #[test]
    fn test_zero_threshold_disables() {
        let guard = NumericGuard::new(0);
        assert!(!guard.trips("11 22 33 44"));
    }
}
