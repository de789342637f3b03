pub mod assistant;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod kiosk;
pub mod locale;
pub mod mode;
pub mod model;
pub mod queue;
pub mod secrets;
pub mod store;
pub mod tracker;
pub mod wizard;

pub use assistant::{AnswerBackend, ChatAssistant, ChatTranscript, GeminiBackend};
pub use config::{load_config, load_config_from_str, Config};
pub use dashboard::{
    actions_for, dashboard_cards, DashboardAction, DashboardCard, DashboardController,
};
pub use error::{
    ConfigError, DashboardError, RegistrationError, Result, StoreError, VisitdeskError,
    WizardError,
};
pub use kiosk::{register_visit, KioskPage, KioskSession};
pub use mode::AppMode;
pub use model::{Catalog, NewVisit, Visit, VisitId, VisitStatus};
pub use queue::{QueueBoard, QueueFeed, QueueProjection};
pub use secrets::{resolve_secret, SecretError};
pub use store::{LocalVisitStore, VisitStore};
pub use tracker::{StatusDisplay, StatusTracker};
pub use wizard::{RegistrationWizard, WizardStep};
