//! Export dispatch: browser downloads for CSV, in-app payloads for the rest.

use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;

use skylog_api::{ApiClient, ApiError, ExportDocument, ExportFormat};

const EXPORT_FALLBACK: &str = "Failed to export data";

/// Opens a URL outside the app. Production uses the system browser; tests
/// substitute a recording stub.
pub trait Navigator: Send + Sync {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// [`Navigator`] backed by the default system browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        webbrowser::open(url).context("Failed to open browser")
    }
}

/// Failure of an export attempt.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The browser never launched. Distinct from a launched download whose
    /// outcome this layer cannot see.
    #[error("Could not open browser: {0}")]
    Navigation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ExportError {
    /// Message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            ExportError::Navigation(_) => EXPORT_FALLBACK.to_string(),
            ExportError::Api(e) => e.user_message(EXPORT_FALLBACK),
        }
    }
}

/// Stateless dispatcher over the two export delivery models.
#[derive(Clone)]
pub struct ExportCoordinator {
    gateway: Arc<ApiClient>,
    navigator: Arc<dyn Navigator>,
}

impl ExportCoordinator {
    pub fn new(gateway: Arc<ApiClient>) -> Self {
        Self::with_navigator(gateway, Arc::new(SystemNavigator))
    }

    pub fn with_navigator(gateway: Arc<ApiClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self { gateway, navigator }
    }

    /// Run an export.
    ///
    /// CSV is delivered as a browser download: the navigator is pointed at
    /// the export URL and `Ok(None)` is returned without any HTTP round trip
    /// from this layer. Once the browser has launched, the download's fate
    /// is unobservable here; only a failed launch is reportable. The other
    /// formats round-trip through the gateway and return the document for
    /// the caller to present.
    pub async fn export(&self, format: ExportFormat) -> Result<Option<ExportDocument>, ExportError> {
        if format.is_download() {
            let url = self.gateway.export_url(format);
            tracing::info!(%url, "opening export download in browser");
            if let Err(e) = self.navigator.open(&url) {
                tracing::warn!(error = %e, "browser launch failed");
                return Err(ExportError::Navigation(e.to_string()));
            }
            return Ok(None);
        }

        match self.gateway.export(format).await {
            Ok(document) => {
                tracing::info!(format = %format, bytes = document.content.len(), "export fetched");
                Ok(Some(document))
            }
            Err(e) => {
                tracing::error!(error = %e, format = %format, "export failed");
                Err(ExportError::Api(e))
            }
        }
    }
}
