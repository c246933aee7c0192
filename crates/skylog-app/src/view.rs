//! Read-only view aggregate for the presentation layer.

use crate::extras::ExtrasView;
use crate::history::HistoryView;
use crate::search::SearchView;

/// Reachability of the backing API, as last probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiStatus {
    #[default]
    Checking,
    Connected,
    Unreachable,
}

impl ApiStatus {
    /// Status line shown in the footer.
    pub fn label(self) -> &'static str {
        match self {
            ApiStatus::Checking => "Checking API...",
            ApiStatus::Connected => "API connected",
            ApiStatus::Unreachable => "API not reachable",
        }
    }
}

/// Everything the presentation layer needs for one render pass.
///
/// Assembled on demand from the orchestrators' current state. The snapshot
/// is detached: holding one never blocks the flows, and mutating the app
/// goes through action handles, never through the snapshot.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    pub api_status: ApiStatus,
    pub search: SearchView,
    pub history: HistoryView,
    pub extras: ExtrasView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_match_footer_strings() {
        assert_eq!(ApiStatus::Checking.label(), "Checking API...");
        assert_eq!(ApiStatus::Connected.label(), "API connected");
        assert_eq!(ApiStatus::Unreachable.label(), "API not reachable");
    }

    #[test]
    fn status_starts_as_checking() {
        assert_eq!(ApiStatus::default(), ApiStatus::Checking);
    }
}
