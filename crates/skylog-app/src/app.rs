//! Application composition root and action handles.

use std::sync::Arc;

use parking_lot::Mutex;

use skylog_api::{ApiClient, ApiError, ExportDocument, ExportFormat, LocationQuery, RecordPatch};

use crate::export::{ExportCoordinator, ExportError, Navigator, SystemNavigator};
use crate::extras::ExtrasOrchestrator;
use crate::history::HistoryStore;
use crate::search::{SearchOrchestrator, ValidationError};
use crate::view::{ApiStatus, ViewSnapshot};

/// Presentation-layer hook for destructive confirmations.
pub trait ConfirmGate {
    /// Return `true` to proceed with the delete.
    fn confirm_delete(&self, id: i64) -> bool;
}

/// Wires one gateway into every flow and owns the API status cell.
///
/// Cloning an `App` clones handles to shared state; all clones observe the
/// same flows.
#[derive(Clone)]
pub struct App {
    gateway: Arc<ApiClient>,
    status: Arc<Mutex<ApiStatus>>,
    search: SearchOrchestrator,
    history: HistoryStore,
    extras: ExtrasOrchestrator,
    export: ExportCoordinator,
}

impl App {
    pub fn new(gateway: ApiClient) -> Self {
        Self::with_navigator(gateway, Arc::new(SystemNavigator))
    }

    pub fn with_navigator(gateway: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        let gateway = Arc::new(gateway);
        let history = HistoryStore::new(gateway.clone());
        Self {
            search: SearchOrchestrator::new(gateway.clone(), history.clone()),
            extras: ExtrasOrchestrator::new(gateway.clone()),
            export: ExportCoordinator::with_navigator(gateway.clone(), navigator),
            status: Arc::new(Mutex::new(ApiStatus::Checking)),
            history,
            gateway,
        }
    }

    /// One-time startup sequence: probe the API, then load saved searches.
    ///
    /// Neither step is fatal. An unreachable API leaves the status badge
    /// saying so, and a failed initial load leaves the list empty; both
    /// recover through the normal flows.
    pub async fn initialize(&self) {
        match self.gateway.health().await {
            Ok(health) => {
                tracing::info!(status = %health.status, "API reachable");
                *self.status.lock() = ApiStatus::Connected;
            }
            Err(e) => {
                tracing::warn!(error = %e, "API health check failed");
                *self.status.lock() = ApiStatus::Unreachable;
            }
        }

        if let Err(e) = self.history.refresh().await {
            tracing::warn!(error = %e, "initial history load failed");
        }
    }

    /// Validate and run a search. See [`SearchOrchestrator::submit`].
    pub async fn search(&self, query: LocationQuery) -> Result<(), ValidationError> {
        self.search.submit(query).await
    }

    /// Re-fetch the saved search list.
    pub async fn refresh_history(&self) -> Result<(), ApiError> {
        self.history.refresh().await
    }

    /// Edit a saved search. See [`HistoryStore::update`].
    pub async fn update_record(&self, id: i64, patch: RecordPatch) -> Result<(), ApiError> {
        self.history.update(id, patch).await
    }

    /// Delete a saved search after consulting the confirmation gate.
    ///
    /// A declined gate means zero network activity and `Ok(false)`.
    pub async fn remove_record(&self, id: i64, gate: &dyn ConfirmGate) -> Result<bool, ApiError> {
        if !gate.confirm_delete(id) {
            tracing::debug!(id, "delete declined at confirmation");
            return Ok(false);
        }
        self.history.remove(id).await?;
        Ok(true)
    }

    /// Open the extras panel for the location currently on screen.
    ///
    /// With no successful search on screen there is nothing to look up and
    /// the call does nothing.
    pub async fn open_extras(&self) {
        let weather = match self.search.current_weather() {
            Some(weather) => weather,
            None => {
                tracing::debug!("extras requested with no weather on screen");
                return;
            }
        };
        self.extras
            .open(&weather.location_name, weather.lat, weather.lon)
            .await;
    }

    /// Hide the extras panel.
    pub fn close_extras(&self) {
        self.extras.close();
    }

    /// Run an export. See [`ExportCoordinator::export`].
    pub async fn export(
        &self,
        format: ExportFormat,
    ) -> Result<Option<ExportDocument>, ExportError> {
        self.export.export(format).await
    }

    /// Assemble the current view state under brief sequential locks.
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            api_status: *self.status.lock(),
            search: self.search.view(),
            history: self.history.view(),
            extras: self.extras.view(),
        }
    }
}
