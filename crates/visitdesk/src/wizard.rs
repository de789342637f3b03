//! Three-step registration wizard: purpose, student identity, teacher.
//!
//! The wizard only accumulates and validates input. Submitting hands back an
//! immutable [`NewVisit`]; talking to the store is the caller's job.

use serde::Serialize;

use crate::error::WizardError;
use crate::model::visit::is_blank;
use crate::model::{NewVisit, CLASS_REQUIRED_GRADE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Purpose,
    Student,
    Teacher,
}

impl WizardStep {
    pub const COUNT: u8 = 3;

    /// 1-based position, as shown on the progress bar.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Purpose => 1,
            WizardStep::Student => 2,
            WizardStep::Teacher => 3,
        }
    }

    fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Purpose => Some(WizardStep::Student),
            WizardStep::Student => Some(WizardStep::Teacher),
            WizardStep::Teacher => None,
        }
    }

    fn prev(self) -> Option<WizardStep> {
        match self {
            WizardStep::Purpose => None,
            WizardStep::Student => Some(WizardStep::Purpose),
            WizardStep::Teacher => Some(WizardStep::Student),
        }
    }
}

/// Accumulated form input. Empty strings mean "not chosen yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub purpose: String,
    pub grade: String,
    pub class_num: String,
    pub name: String,
    pub teacher: String,
}

#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    step: WizardStep,
    form: FormData,
    class_required_grade: String,
    submitting: bool,
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::with_class_required_grade(CLASS_REQUIRED_GRADE)
    }

    /// Uses `grade` as the grade that must also pick a class number.
    pub fn with_class_required_grade(grade: &str) -> Self {
        Self {
            step: WizardStep::Purpose,
            form: FormData::default(),
            class_required_grade: grade.to_string(),
            submitting: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the class picker should be shown for the chosen grade.
    pub fn needs_class(&self) -> bool {
        self.form.grade == self.class_required_grade
    }

    /// Choosing a purpose immediately moves on to the student step.
    pub fn select_purpose(&mut self, purpose: &str) {
        self.form.purpose = purpose.trim().to_string();
        if self.step == WizardStep::Purpose && self.is_step_valid(WizardStep::Purpose) {
            self.step = WizardStep::Student;
        }
    }

    /// Sets the grade; any other grade than the class-requiring one clears the class.
    pub fn select_grade(&mut self, grade: &str) {
        self.form.grade = grade.trim().to_string();
        if !self.needs_class() {
            self.form.class_num.clear();
        }
    }

    pub fn select_class(&mut self, class_num: &str) {
        self.form.class_num = class_num.trim().to_string();
    }

    pub fn set_name(&mut self, name: &str) {
        self.form.name = name.trim().to_string();
    }

    pub fn select_teacher(&mut self, teacher: &str) {
        self.form.teacher = teacher.trim().to_string();
    }

    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        let form = &self.form;
        match step {
            WizardStep::Purpose => !is_blank(&form.purpose),
            WizardStep::Student => {
                !is_blank(&form.grade)
                    && !is_blank(&form.name)
                    && (!self.needs_class() || !is_blank(&form.class_num))
            }
            WizardStep::Teacher => !is_blank(&form.teacher),
        }
    }

    pub fn can_advance(&self) -> bool {
        self.step.next().is_some() && self.is_step_valid(self.step)
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::AtLastStep)?;
        if !self.is_step_valid(self.step) {
            return Err(WizardError::StepIncomplete {
                step: self.step.number(),
            });
        }
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let prev = self.step.prev().ok_or(WizardError::AtFirstStep)?;
        self.step = prev;
        Ok(prev)
    }

    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Teacher
            && self.is_step_valid(WizardStep::Teacher)
            && !self.submitting
    }

    /// Starts a submission and returns the request to hand to the store.
    ///
    /// Further calls fail until [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<NewVisit, WizardError> {
        if self.submitting {
            return Err(WizardError::AlreadySubmitting);
        }
        if self.step != WizardStep::Teacher {
            return Err(WizardError::NotOnLastStep);
        }
        if !self.is_step_valid(WizardStep::Teacher) {
            return Err(WizardError::StepIncomplete {
                step: WizardStep::Teacher.number(),
            });
        }

        self.submitting = true;
        Ok(self.request())
    }

    /// Marks the in-flight submission as resolved, successful or not.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    fn request(&self) -> NewVisit {
        let form = &self.form;
        NewVisit {
            purpose: form.purpose.clone(),
            grade: form.grade.clone(),
            class_num: if self.needs_class() && !is_blank(&form.class_num) {
                Some(form.class_num.clone())
            } else {
                None
            },
            name: form.name.clone(),
            teacher: form.teacher.clone(),
        }
    }
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}
