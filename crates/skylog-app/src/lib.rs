//! Application state layer for Skylog
//!
//! Orchestrates the search, history, extras and export flows over the typed
//! API gateway, and exposes a read-only view snapshot for whatever renders
//! it. Everything runs on a single cooperative runtime; overlapping requests
//! are resolved by request tokens, never by cancellation.

pub mod app;
pub mod export;
pub mod extras;
pub mod history;
pub mod search;
pub mod token;
pub mod view;

pub use app::{App, ConfirmGate};
pub use export::{ExportCoordinator, ExportError, Navigator, SystemNavigator};
pub use extras::{ExtrasOrchestrator, ExtrasView};
pub use history::{HistoryStore, HistoryView};
pub use search::{SearchOrchestrator, SearchPhase, SearchView, ValidationError};
pub use view::{ApiStatus, ViewSnapshot};
