//! Search flow orchestration: validation, race handling, result application.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use skylog_api::{ApiClient, LocationQuery, WeatherSnapshot};

use crate::history::HistoryStore;
use crate::token::TokenSeries;

const SEARCH_FALLBACK: &str = "Something went wrong while fetching weather.";

/// Rejection for submissions that never reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a location.")]
    EmptyLocation,
}

/// Where the search flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

impl SearchPhase {
    /// True while a request is in flight.
    pub fn is_loading(self) -> bool {
        matches!(self, SearchPhase::Loading)
    }
}

/// Rendered view of the search flow.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub phase: SearchPhase,
    /// Most recently applied result. Kept on screen through later failures
    /// and while a new request loads.
    pub weather: Option<Arc<WeatherSnapshot>>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct SearchState {
    phase: SearchPhase,
    weather: Option<Arc<WeatherSnapshot>>,
    error: Option<String>,
    tokens: TokenSeries,
}

/// Drives the search flow.
///
/// Overlapping submissions are legal; the newest one wins. An older request
/// that completes after being superseded is dropped without touching the
/// view or the history cache.
#[derive(Clone)]
pub struct SearchOrchestrator {
    gateway: Arc<ApiClient>,
    history: HistoryStore,
    state: Arc<Mutex<SearchState>>,
}

impl SearchOrchestrator {
    pub fn new(gateway: Arc<ApiClient>, history: HistoryStore) -> Self {
        Self {
            gateway,
            history,
            state: Arc::new(Mutex::new(SearchState::default())),
        }
    }

    /// Validate and run a search.
    ///
    /// A blank location is rejected before any network activity; the
    /// rejection lands in the view's error slot as well as the return
    /// value. Accepted submissions always return `Ok`, with any failure
    /// surfacing through the view instead.
    ///
    /// Every applied success triggers exactly one history refresh: whether
    /// a search left a new record behind is server policy, so the list is
    /// re-fetched rather than guessed at.
    pub async fn submit(&self, query: LocationQuery) -> Result<(), ValidationError> {
        if query.location.trim().is_empty() {
            let err = ValidationError::EmptyLocation;
            self.state.lock().error = Some(err.to_string());
            return Err(err);
        }

        let token = {
            let mut state = self.state.lock();
            state.phase = SearchPhase::Loading;
            state.error = None;
            state.tokens.next()
        };
        tracing::info!(location = %query.location, token, "search started");

        let result = self.gateway.search_weather(&query).await;

        let applied = {
            let mut state = self.state.lock();
            if !state.tokens.is_current(token) {
                tracing::debug!(token, "search superseded, dropping result");
                return Ok(());
            }
            match result {
                Ok(snapshot) => {
                    tracing::info!(location = %snapshot.location_name, "search succeeded");
                    state.weather = Some(Arc::new(snapshot));
                    state.phase = SearchPhase::Success;
                    true
                }
                Err(e) => {
                    tracing::error!(error = %e, "search failed");
                    state.error = Some(e.user_message(SEARCH_FALLBACK));
                    state.phase = SearchPhase::Failed;
                    false
                }
            }
        };

        if applied {
            let _ = self.history.refresh().await;
        }

        Ok(())
    }

    /// Rendered view of the flow.
    pub fn view(&self) -> SearchView {
        let state = self.state.lock();
        SearchView {
            phase: state.phase,
            weather: state.weather.clone(),
            error: state.error.clone(),
        }
    }

    /// Currently displayed snapshot, if any search has succeeded.
    pub fn current_weather(&self) -> Option<Arc<WeatherSnapshot>> {
        self.state.lock().weather.clone()
    }
}
