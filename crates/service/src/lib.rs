//! Record service for the academic records domain.
//! - Validated CRUD over years, disciplines, classes, users, semesters and grades.
//! - Storage sits behind the [`storage::RecordStore`] contract; [`storage::SeaOrmStore`] is the database-backed one.
//! - Store failures surface as one [`errors::RecordError`] per call.
//! - New grades notify the student through a [`notify::Notifier`].

pub mod domain;
pub mod errors;
pub mod notify;
pub mod records;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use errors::{ErrorKind, RecordError};
pub use records::RecordService;
