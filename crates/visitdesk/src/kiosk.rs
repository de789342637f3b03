//! Student kiosk flow: welcome screen, registration form, live status.

use std::sync::Arc;

use tracing::Instrument;

use crate::error::RegistrationError;
use crate::locale;
use crate::model::{Catalog, NewVisit, VisitId};
use crate::store::VisitStore;
use crate::tracker::StatusTracker;
use crate::wizard::RegistrationWizard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KioskPage {
    Welcome,
    Form,
    Status,
}

/// Validates and pushes a registration.
///
/// Rejects requests with unset fields or a teacher outside the catalog before
/// touching the store; values are trimmed and a class number the grade does
/// not call for is dropped.
pub async fn register_visit(
    store: &dyn VisitStore,
    request: NewVisit,
    catalog: &Catalog,
) -> Result<VisitId, RegistrationError> {
    let missing = request.missing_fields(&catalog.class_required_grade);
    if !missing.is_empty() {
        return Err(RegistrationError::MissingFields { fields: missing });
    }

    let request = request.normalized(&catalog.class_required_grade);
    if catalog.teacher_by_name(&request.teacher).is_none() {
        return Err(RegistrationError::UnknownTeacher {
            name: request.teacher,
        });
    }


    let span = tracing::info_span!("kiosk.register", purpose = %request.purpose);
    let id = store.push(request).instrument(span).await?;
    log::info!("Registered visit {}", id);
    Ok(id)
}

pub struct KioskSession {
    store: Arc<dyn VisitStore>,
    catalog: Catalog,
    page: KioskPage,
    wizard: RegistrationWizard,
    tracker: Option<StatusTracker>,
    error: Option<&'static str>,
}

impl KioskSession {
    pub fn new(store: Arc<dyn VisitStore>, catalog: &Catalog) -> Self {
        Self {
            store,
            catalog: catalog.clone(),
            page: KioskPage::Welcome,
            wizard: RegistrationWizard::with_class_required_grade(&catalog.class_required_grade),
            tracker: None,
            error: None,
        }
    }

    pub fn page(&self) -> KioskPage {
        self.page
    }

    pub fn wizard(&self) -> &RegistrationWizard {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut RegistrationWizard {
        &mut self.wizard
    }

    /// The tracker for the visit just registered, on the status page.
    pub fn tracker(&self) -> Option<&StatusTracker> {
        self.tracker.as_ref()
    }

    pub fn tracker_mut(&mut self) -> Option<&mut StatusTracker> {
        self.tracker.as_mut()
    }

    /// Message to show on the form after a failed submission.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Opens a fresh registration form.
    pub fn start_registration(&mut self) {
        self.reset_form();
        self.page = KioskPage::Form;
    }

    /// Abandons the form and goes back to the welcome screen.
    pub fn cancel(&mut self) {
        self.reset_form();
        self.page = KioskPage::Welcome;
    }

    /// Submits the completed form. On success the session switches to the
    /// status page tracking the new visit; on failure it stays on the form.
    pub async fn submit(&mut self) -> Result<VisitId, RegistrationError> {
        let request = self.wizard.begin_submit()?;
        let result = register_visit(self.store.as_ref(), request, &self.catalog).await;
        self.wizard.finish_submit();

        match result {
            Ok(id) => {
                self.tracker = Some(StatusTracker::watch(self.store.as_ref(), &id));
                self.reset_form();
                self.page = KioskPage::Status;
                Ok(id)
            }
            Err(e) => {
                log::error!("{}: {}", locale::REGISTRATION_FAILED, e);
                self.error = Some(locale::SUBMISSION_RETRY);
                Err(e)
            }
        }
    }

    /// Leaves the status page; the tracker subscription is released.
    pub fn return_home(&mut self) {
        self.tracker = None;
        self.page = KioskPage::Welcome;
    }

    fn reset_form(&mut self) {
        self.wizard =
            RegistrationWizard::with_class_required_grade(&self.catalog.class_required_grade);
        self.error = None;
    }
}
