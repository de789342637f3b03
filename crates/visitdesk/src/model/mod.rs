//! Domain types for visits and the kiosk catalog.

pub mod catalog;
pub mod visit;

pub use catalog::{Catalog, Teacher, CLASS_REQUIRED_GRADE};
pub use visit::{NewVisit, Visit, VisitId, VisitStatus};
