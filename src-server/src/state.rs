use std::sync::Arc;

use tokio::sync::watch;
use visitdesk::assistant::ChatAssistant;
use visitdesk::dashboard::DashboardController;
use visitdesk::model::Catalog;
use visitdesk::store::VisitStore;

/// Shared state handed to every handler.
pub struct AppState {
    pub store: Arc<dyn VisitStore>,
    pub dashboard: DashboardController,
    pub assistant: ChatAssistant,
    pub catalog: Catalog,
    /// Flips to `true` when the server is shutting down; ends open streams.
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn VisitStore>,
        assistant: ChatAssistant,
        catalog: Catalog,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            dashboard: DashboardController::new(store.clone()),
            store,
            assistant,
            catalog,
            shutdown,
        }
    }
}
