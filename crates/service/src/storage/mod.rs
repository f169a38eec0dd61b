//! Storage gateway contract.
//!
//! Every entity is described by a zero-sized [`RecordKind`] marker; a store
//! implements [`RecordStore<K>`] once per kind. Constraint failures come back
//! as structured [`StoreError::Violation`] values naming the field involved so
//! the record service can translate them without knowing the driver.

use async_trait::async_trait;
use common::pagination::Pagination;
use models::{class, discipline, year};
use thiserror::Error;

use crate::domain::{
    ClassPatch, DisciplinePatch, GradeDetails, GradeFilter, GradePatch, NewClass, NewDiscipline, NewGrade,
    NewSemester, NewUser, NewYear, SemesterDetails, SemesterFilter, SemesterPatch, User, UserFilter, UserPatch,
    YearPatch,
};

pub mod seaorm;

pub use seaorm::SeaOrmStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
}

/// Which rule the store refused and on which column.
///
/// `field` is `None` when the driver did not say and the store could not
/// work it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    pub field: Option<&'static str>,
}

impl ConstraintViolation {
    pub fn unique(field: Option<&'static str>) -> Self {
        Self { kind: ConstraintKind::Unique, field }
    }

    pub fn foreign_key(field: Option<&'static str>) -> Self {
        Self { kind: ConstraintKind::ForeignKey, field }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,
    #[error("constraint violation: {0:?}")]
    Violation(ConstraintViolation),
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Offset pagination plus an entity specific filter.
#[derive(Debug, Clone, Default)]
pub struct ListQuery<F> {
    pub page: Pagination,
    pub filter: F,
}

impl<F> ListQuery<F> {
    pub fn new(page: Pagination, filter: F) -> Self {
        Self { page, filter }
    }
}

/// Type-level description of one entity handled by the store.
pub trait RecordKind: Send + Sync + 'static {
    /// The row as returned to callers, with relations attached.
    type Record: Clone + Send + Sync;
    type NewRecord: Send + Sync;
    type Patch: Default + Send + Sync;
    type Filter: Default + Clone + Send + Sync;
}

pub struct Years;
pub struct Disciplines;
pub struct Classes;
pub struct Users;
pub struct Semesters;
pub struct Grades;

impl RecordKind for Years {
    type Record = year::Model;
    type NewRecord = NewYear;
    type Patch = YearPatch;
    type Filter = ();
}

impl RecordKind for Disciplines {
    type Record = discipline::Model;
    type NewRecord = NewDiscipline;
    type Patch = DisciplinePatch;
    type Filter = ();
}

impl RecordKind for Classes {
    type Record = class::Model;
    type NewRecord = NewClass;
    type Patch = ClassPatch;
    type Filter = ();
}

impl RecordKind for Users {
    type Record = User;
    type NewRecord = NewUser;
    type Patch = UserPatch;
    type Filter = UserFilter;
}

impl RecordKind for Semesters {
    type Record = SemesterDetails;
    type NewRecord = NewSemester;
    type Patch = SemesterPatch;
    type Filter = SemesterFilter;
}

impl RecordKind for Grades {
    type Record = GradeDetails;
    type NewRecord = NewGrade;
    type Patch = GradePatch;
    type Filter = GradeFilter;
}

/// Typed CRUD against the relational store for one entity kind.
#[async_trait]
pub trait RecordStore<K: RecordKind>: Send + Sync {
    async fn find(&self, id: i32) -> Result<Option<K::Record>, StoreError>;
    async fn find_many(&self, query: &ListQuery<K::Filter>) -> Result<Vec<K::Record>, StoreError>;
    async fn create(&self, data: K::NewRecord) -> Result<K::Record, StoreError>;
    /// Apply the `Some` fields of `patch`; `NotFound` when `id` does not exist.
    async fn update(&self, id: i32, patch: K::Patch) -> Result<K::Record, StoreError>;
    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}

/// A store able to serve every sub-service of the record service.
pub trait StorageGateway:
    RecordStore<Years>
    + RecordStore<Disciplines>
    + RecordStore<Classes>
    + RecordStore<Users>
    + RecordStore<Semesters>
    + RecordStore<Grades>
{
}

impl<T> StorageGateway for T where
    T: RecordStore<Years>
        + RecordStore<Disciplines>
        + RecordStore<Classes>
        + RecordStore<Users>
        + RecordStore<Semesters>
        + RecordStore<Grades>
{
}
