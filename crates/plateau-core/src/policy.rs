#![forbid(unsafe_code)]

//! Re-entrancy policy for cell writes.
//!
//! A write is *re-entrant* when it targets a cell that is still delivering a
//! previous write to its listeners (for example a listener that writes back
//! into the cell it observes). Each cell counts its in-flight notification
//! sweeps and consults its [`ReentrancyPolicy`] before accepting a write.

/// Default nesting bound for [`ReentrancyPolicy::Bounded`].
pub const DEFAULT_MAX_REENTRANT_DEPTH: usize = 32;

/// How a cell treats writes that arrive while it is notifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum ReentrancyPolicy {
    /// Allow nested writes until `max_depth` sweeps are in flight.
    ///
    /// A `max_depth` of zero is treated as one (plain, non-nested writes are
    /// always accepted).
    Bounded {
        /// Maximum number of simultaneously running notification sweeps.
        max_depth: usize,
    },
    /// Refuse every write made while the cell is notifying.
    Reject,
}

impl Default for ReentrancyPolicy {
    fn default() -> Self {
        Self::Bounded {
            max_depth: DEFAULT_MAX_REENTRANT_DEPTH,
        }
    }
}

impl ReentrancyPolicy {
    /// Bounded policy with the given nesting limit.
    #[must_use]
    pub const fn bounded(max_depth: usize) -> Self {
        Self::Bounded { max_depth }
    }

    /// Number of sweeps that may be in flight when a write is accepted.
    #[must_use]
    pub fn limit(&self) -> usize {
        match *self {
            Self::Bounded { max_depth } => max_depth.max(1),
            Self::Reject => 1,
        }
    }

    /// Whether a write is accepted while `depth` sweeps are in flight.
    #[must_use]
    pub fn permits(&self, depth: usize) -> bool {
        depth < self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_bounded() {
        assert_eq!(
            ReentrancyPolicy::default(),
            ReentrancyPolicy::bounded(DEFAULT_MAX_REENTRANT_DEPTH)
        );
    }

    #[test]
    fn reject_only_permits_top_level_writes() {
        let policy = ReentrancyPolicy::Reject;
        assert!(policy.permits(0));
        assert!(!policy.permits(1));
    }

    #[test]
    fn bounded_counts_nesting() {
        let policy = ReentrancyPolicy::bounded(3);
        assert!(policy.permits(2));
        assert!(!policy.permits(3));
    }

    #[test]
    fn zero_bound_still_permits_plain_writes() {
        let policy = ReentrancyPolicy::bounded(0);
        assert!(policy.permits(0));
        assert!(!policy.permits(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn policy_deserializes_from_tagged_json() {
        let policy: ReentrancyPolicy =
            serde_json::from_str(r#"{"mode":"bounded","max_depth":8}"#).unwrap();
        assert_eq!(policy, ReentrancyPolicy::bounded(8));
        let policy: ReentrancyPolicy = serde_json::from_str(r#"{"mode":"reject"}"#).unwrap();
        assert_eq!(policy, ReentrancyPolicy::Reject);
    }
}
