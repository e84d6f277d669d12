#![forbid(unsafe_code)]

//! Scope configuration.

use plateau_core::ReentrancyPolicy;

/// Report every cell write to the scope's observer when truthy.
pub const ENV_TRACE_CELLS: &str = "PLATEAU_TRACE_CELLS";
/// Re-entrancy limit for dealt cells: a depth, or `reject`.
pub const ENV_MAX_REENTRANT_DEPTH: &str = "PLATEAU_MAX_REENTRANT_DEPTH";

/// Settings for a [`Scope`](crate::Scope).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScopeConfig {
    /// Name reported with every observer event and log line.
    pub label: String,
    /// Subscribe to every registered cell and report its writes to the
    /// observer as [`ScopeEvent::CellChanged`](crate::ScopeEvent::CellChanged).
    pub trace_cells: bool,
    /// Re-entrancy policy given to cells built by `deal`.
    pub deal_policy: ReentrancyPolicy,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            label: String::from("plateau"),
            trace_cells: false,
            deal_policy: ReentrancyPolicy::default(),
        }
    }
}

impl ScopeConfig {
    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Enable or disable cell write tracing.
    #[must_use]
    pub fn with_trace_cells(mut self, trace_cells: bool) -> Self {
        self.trace_cells = trace_cells;
        self
    }

    /// Set the policy for dealt cells.
    #[must_use]
    pub fn with_deal_policy(mut self, policy: ReentrancyPolicy) -> Self {
        self.deal_policy = policy;
        self
    }

    /// Defaults overridden by `PLATEAU_TRACE_CELLS` and
    /// `PLATEAU_MAX_REENTRANT_DEPTH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_TRACE_CELLS) {
            config.trace_cells = truthy(&raw);
        }
        if let Some(raw) = lookup(ENV_MAX_REENTRANT_DEPTH) {
            match parse_policy(&raw) {
                Some(policy) => config.deal_policy = policy,
                None => tracing::warn!(
                    var = ENV_MAX_REENTRANT_DEPTH,
                    value = %raw,
                    "ignoring unparseable re-entrancy depth"
                ),
            }
        }
        config
    }
}

fn truthy(raw: &str) -> bool {
    let raw = raw.trim();
    raw == "1" || raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("on")
}

fn parse_policy(raw: &str) -> Option<ReentrancyPolicy> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("reject") {
        return Some(ReentrancyPolicy::Reject);
    }
    raw.parse::<usize>()
        .ok()
        .filter(|depth| *depth > 0)
        .map(ReentrancyPolicy::bounded)
}
