use thiserror::Error;
use tracing::error;

use crate::storage::{ConstraintKind, StoreError};

/// Tag of a [`RecordError`], for callers that only need the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    RelatedEntityMissing,
    DependencyConflict,
    Internal,
}

/// Outcome of a failed record service call. Exactly one per call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    RelatedEntityMissing(String),
    #[error("{0}")]
    DependencyConflict(String),
    #[error("{0}")]
    Internal(String),
}

impl RecordError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{entity} Not Found")) }

    pub fn internal() -> Self { Self::Internal("Internal Server Error".into()) }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::NotFound(_) => ErrorKind::NotFound,
            RecordError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            RecordError::RelatedEntityMissing(_) => ErrorKind::RelatedEntityMissing,
            RecordError::DependencyConflict(_) => ErrorKind::DependencyConflict,
            RecordError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            RecordError::NotFound(_) => 2001,
            RecordError::AlreadyExists(_) => 2002,
            RecordError::RelatedEntityMissing(_) => 2003,
            RecordError::DependencyConflict(_) => 2004,
            RecordError::Internal(_) => 2100,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RecordError::NotFound(m)
            | RecordError::AlreadyExists(m)
            | RecordError::RelatedEntityMissing(m)
            | RecordError::DependencyConflict(m)
            | RecordError::Internal(m) => m,
        }
    }
}

/// Which kind of store call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// find / find_many
    Read,
    /// create / update
    Write,
    Delete,
}

/// Per-entity vocabulary for translating store failures.
#[derive(Debug)]
pub struct ErrorTable {
    pub entity: &'static str,
    pub already_exists: &'static str,
    /// foreign key column -> message when the referenced row is missing
    pub references: &'static [(&'static str, &'static str)],
}

impl ErrorTable {
    pub const fn named(entity: &'static str, already_exists: &'static str) -> Self {
        Self { entity, already_exists, references: &[] }
    }

    fn reference(&self, field: Option<&str>) -> &'static str {
        field
            .and_then(|f| self.references.iter().find(|(name, _)| *name == f))
            .map(|(_, msg)| *msg)
            .unwrap_or("Related Entity Does Not Exist")
    }
}

pub const DEPENDENCY_CONFLICT: &str = "Foreign Key Violation";

/// Translate a storage failure into the domain vocabulary of `table`.
pub fn map_store_error(table: &ErrorTable, op: Op, err: StoreError) -> RecordError {
    match err {
        StoreError::NotFound => RecordError::not_found(table.entity),
        StoreError::Violation(v) => match (v.kind, op) {
            // a read cannot violate a constraint
            (_, Op::Read) => {
                error!(entity = table.entity, violation = ?v, "constraint violation reported for a read");
                RecordError::internal()
            }
            (ConstraintKind::Unique, _) => RecordError::AlreadyExists(table.already_exists.into()),
            (ConstraintKind::ForeignKey, Op::Write) => RecordError::RelatedEntityMissing(table.reference(v.field).into()),
            (ConstraintKind::ForeignKey, Op::Delete) => RecordError::DependencyConflict(DEPENDENCY_CONFLICT.into()),
        },
        StoreError::Backend(msg) => {
            error!(entity = table.entity, ?op, error = %msg, "storage failure");
            RecordError::internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ConstraintViolation;

    const GRADE: ErrorTable = ErrorTable {
        entity: "Grade",
        already_exists: "Grade Already Exists",
        references: &[("semester_id", "Semester Does Not Exist"), ("discipline_id", "Discipline Does Not Exist")],
    };

    #[test]
    fn foreign_key_on_write_names_the_reference() {
        let e = map_store_error(&GRADE, Op::Write, StoreError::Violation(ConstraintViolation::foreign_key(Some("discipline_id"))));
        assert_eq!(e, RecordError::RelatedEntityMissing("Discipline Does Not Exist".into()));
    }

    #[test]
    fn unknown_reference_falls_back_to_generic_message() {
        let e = map_store_error(&GRADE, Op::Write, StoreError::Violation(ConstraintViolation::foreign_key(None)));
        assert_eq!(e.kind(), ErrorKind::RelatedEntityMissing);
        assert_eq!(e.message(), "Related Entity Does Not Exist");
    }

    #[test]
    fn foreign_key_on_delete_is_dependency_conflict() {
        let e = map_store_error(&GRADE, Op::Delete, StoreError::Violation(ConstraintViolation::foreign_key(None)));
        assert_eq!(e, RecordError::DependencyConflict("Foreign Key Violation".into()));
    }

    #[test]
    fn unique_and_not_found() {
        let table = ErrorTable::named("Class", "Class Already Exists");
        let dup = map_store_error(&table, Op::Write, StoreError::Violation(ConstraintViolation::unique(Some("name"))));
        assert_eq!(dup.to_string(), "Class Already Exists");
        let missing = map_store_error(&table, Op::Delete, StoreError::NotFound);
        assert_eq!(missing, RecordError::NotFound("Class Not Found".into()));
        assert_eq!(missing.code(), 2001);
    }

    #[test]
    fn read_failures_are_internal_or_not_found() {
        let table = ErrorTable::named("Class", "Class Already Exists");
        let missing = map_store_error(&table, Op::Read, StoreError::NotFound);
        assert_eq!(missing, RecordError::NotFound("Class Not Found".into()));
        let odd = map_store_error(&table, Op::Read, StoreError::Violation(ConstraintViolation::unique(Some("name"))));
        assert_eq!(odd.kind(), ErrorKind::Internal);
    }

    #[test]
    fn backend_failure_is_internal() {
        let table = ErrorTable::named("Year", "Year Already Exists");
        let e = map_store_error(&table, Op::Write, StoreError::Backend("connection reset".into()));
        assert_eq!(e.kind(), ErrorKind::Internal);
        assert!(!e.message().contains("connection reset"));
    }
}
