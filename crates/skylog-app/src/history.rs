//! In-memory projection of the server's saved-search history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use skylog_api::{ApiClient, ApiError, HistoryRecord, RecordPatch};

use crate::token::TokenSeries;

const UPDATE_FALLBACK: &str = "Failed to update record";
const DELETE_FALLBACK: &str = "Failed to delete record";

/// Rendered view of the history cache.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    pub records: Vec<HistoryRecord>,
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Message from the most recent failed mutation, cleared by the next
    /// successful one. Failed refreshes log instead of landing here.
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct HistoryState {
    records: Vec<HistoryRecord>,
    last_synced_at: Option<DateTime<Utc>>,
    error: Option<String>,
    tokens: TokenSeries,
}

/// Client-side cache of saved searches.
///
/// The cache only ever holds one complete server response. Every mutation
/// reconciles by re-fetching the list; nothing is patched in locally, so
/// the cache can never drift into a state the server never produced.
#[derive(Clone)]
pub struct HistoryStore {
    gateway: Arc<ApiClient>,
    state: Arc<Mutex<HistoryState>>,
}

impl HistoryStore {
    pub fn new(gateway: Arc<ApiClient>) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(HistoryState::default())),
        }
    }

    /// Re-fetch the history list and replace the cache wholesale.
    ///
    /// Overlapping refreshes resolve by token: one that completes after
    /// being superseded is dropped, so the cache always reflects the most
    /// recently initiated fetch that finished while still current. On
    /// failure the stale cache is kept and the error is only logged here;
    /// callers decide whether to surface it.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let token = self.state.lock().tokens.next();

        match self.gateway.list_records().await {
            Ok(records) => {
                let mut state = self.state.lock();
                if !state.tokens.is_current(token) {
                    tracing::debug!(token, "history refresh superseded, dropping result");
                    return Ok(());
                }
                tracing::info!(count = records.len(), "history refreshed");
                state.records = records;
                state.last_synced_at = Some(Utc::now());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "history refresh failed, keeping stale cache");
                Err(e)
            }
        }
    }

    /// Apply a partial update to a record, then re-fetch the list.
    ///
    /// The patch is normalized first so cleared text fields cross the wire
    /// as explicit nulls. The row the server returns is discarded; the
    /// follow-up refresh is the sole source of cache content.
    pub async fn update(&self, id: i64, patch: RecordPatch) -> Result<(), ApiError> {
        match self.gateway.update_record(id, &patch.normalized()).await {
            Ok(_) => {
                self.state.lock().error = None;
                tracing::info!(id, "record updated");
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(id, error = %e, "record update failed");
                self.state.lock().error = Some(e.user_message(UPDATE_FALLBACK));
                Err(e)
            }
        }
    }

    /// Delete a record, then re-fetch the list.
    ///
    /// Confirmation is the caller's concern; see `App::remove_record`.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        match self.gateway.delete_record(id).await {
            Ok(()) => {
                self.state.lock().error = None;
                tracing::info!(id, "record deleted");
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(id, error = %e, "record delete failed");
                self.state.lock().error = Some(e.user_message(DELETE_FALLBACK));
                Err(e)
            }
        }
    }

    /// Snapshot of the cache for rendering.
    pub fn view(&self) -> HistoryView {
        let state = self.state.lock();
        HistoryView {
            records: state.records.clone(),
            last_synced_at: state.last_synced_at,
            error: state.error.clone(),
        }
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
