//! Extras panel: map and related videos for the location on screen.

use std::sync::Arc;

use parking_lot::Mutex;

use skylog_api::{ApiClient, ExtrasBundle};

use crate::token::TokenSeries;

/// Rendered view of the extras panel.
#[derive(Debug, Clone, Default)]
pub struct ExtrasView {
    pub visible: bool,
    pub loading: bool,
    /// `None` while loading or after a failed fetch. A present bundle with
    /// no map and no videos is still a successful fetch; the panel renders
    /// it as "not available", not as an error.
    pub bundle: Option<ExtrasBundle>,
}

#[derive(Debug, Default)]
struct ExtrasState {
    visible: bool,
    loading: bool,
    bundle: Option<ExtrasBundle>,
    tokens: TokenSeries,
}

/// Opens and closes the extras panel and loads its content.
#[derive(Clone)]
pub struct ExtrasOrchestrator {
    gateway: Arc<ApiClient>,
    state: Arc<Mutex<ExtrasState>>,
}

impl ExtrasOrchestrator {
    pub fn new(gateway: Arc<ApiClient>) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(ExtrasState::default())),
        }
    }

    /// Show the panel and fetch extras for the given location.
    ///
    /// The panel becomes visible immediately in its loading state. A fetch
    /// failure leaves the panel open with nothing to show; it is logged but
    /// never surfaced as a user-facing error.
    pub async fn open(&self, location_name: &str, lat: f64, lon: f64) {
        let token = {
            let mut state = self.state.lock();
            state.visible = true;
            state.loading = true;
            state.bundle = None;
            state.tokens.next()
        };
        tracing::info!(location = location_name, "opening extras panel");

        let result = self.gateway.fetch_extras(location_name, lat, lon).await;

        let mut state = self.state.lock();
        if !state.tokens.is_current(token) {
            tracing::debug!(token, "extras fetch superseded, dropping result");
            return;
        }
        state.loading = false;
        match result {
            Ok(bundle) => {
                tracing::debug!(
                    has_map = bundle.map_url.is_some(),
                    videos = bundle.videos.len(),
                    "extras loaded"
                );
                state.bundle = Some(bundle);
            }
            Err(e) => {
                tracing::warn!(error = %e, "extras fetch failed");
                state.bundle = None;
            }
        }
    }

    /// Hide the panel and drop any in-flight fetch.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.visible = false;
        state.loading = false;
        state.bundle = None;
        state.tokens.invalidate();
        tracing::debug!("extras panel closed");
    }

    /// Rendered view of the panel.
    pub fn view(&self) -> ExtrasView {
        let state = self.state.lock();
        ExtrasView {
            visible: state.visible,
            loading: state.loading,
            bundle: state.bundle.clone(),
        }
    }
}
