use std::path::PathBuf;
use thiserror::Error;

use crate::model::{VisitId, VisitStatus};

#[derive(Error, Debug)]
pub enum VisitdeskError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] crate::assistant::AssistantError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid catalog entry '{entry}': {reason}")]
    InvalidCatalog { entry: String, reason: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Visit not found: {0}")]
    NotFound(VisitId),

    #[error("Visit {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: VisitId,
        from: VisitStatus,
        to: VisitStatus,
    },

    #[error("Visit {serving} is already being served")]
    ServingSlotTaken { serving: VisitId },

    #[error("Persistence failed: {0}")]
    Persistence(#[from] crate::db::DatabaseError),
}

/// Dashboard command failure. Displays as the generic banner message; the
/// underlying store error is kept as the source.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{}", crate::locale::STATUS_UPDATE_FAILED)]
    UpdateFailed {
        id: VisitId,
        #[source]
        source: StoreError,
    },
}

/// Failure to register a new visit from a kiosk or the HTTP surface.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("Unknown teacher: {name}")]
    UnknownTeacher { name: String },

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("{}", crate::locale::SUBMISSION_RETRY)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WizardError {
    #[error("Step {step} is incomplete")]
    StepIncomplete { step: u8 },

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Already at the last step")]
    AtLastStep,

    #[error("A submission is already in flight")]
    AlreadySubmitting,

    #[error("Submission is only possible from the last step")]
    NotOnLastStep,
}

pub type Result<T> = std::result::Result<T, VisitdeskError>;
