//! Record service: validated CRUD per entity with domain error mapping.
//!
//! Each sub-service holds the same shared store handle. Store failures are
//! translated through the entity's [`ErrorTable`].

use std::sync::Arc;

use common::pagination::Pagination;
use configs::NotificationPolicy;

use crate::errors::{map_store_error, ErrorTable, Op, RecordError};
use crate::notify::Notifier;
use crate::storage::{ListQuery, RecordKind, RecordStore, StorageGateway};

pub mod class;
pub mod discipline;
pub mod grade;
pub mod semester;
pub mod user;
pub mod year;

pub use class::ClassService;
pub use discipline::DisciplineService;
pub use grade::GradeService;
pub use semester::SemesterService;
pub use user::UserService;
pub use year::YearService;

pub(crate) async fn create_one<K, S>(store: &S, table: &ErrorTable, data: K::NewRecord) -> Result<K::Record, RecordError>
where
    K: RecordKind,
    S: RecordStore<K> + ?Sized,
{
    store.create(data).await.map_err(|e| map_store_error(table, Op::Write, e))
}

pub(crate) async fn get_all<K, S>(
    store: &S,
    table: &ErrorTable,
    page: Pagination,
    filter: K::Filter,
) -> Result<Vec<K::Record>, RecordError>
where
    K: RecordKind,
    S: RecordStore<K> + ?Sized,
{
    store
        .find_many(&ListQuery::new(page, filter))
        .await
        .map_err(|e| map_store_error(table, Op::Read, e))
}

pub(crate) async fn get_one<K, S>(store: &S, table: &ErrorTable, id: i32) -> Result<K::Record, RecordError>
where
    K: RecordKind,
    S: RecordStore<K> + ?Sized,
{
    store
        .find(id)
        .await
        .map_err(|e| map_store_error(table, Op::Read, e))?
        .ok_or_else(|| RecordError::not_found(table.entity))
}

pub(crate) async fn update_one<K, S>(
    store: &S,
    table: &ErrorTable,
    id: i32,
    patch: K::Patch,
) -> Result<K::Record, RecordError>
where
    K: RecordKind,
    S: RecordStore<K> + ?Sized,
{
    store.update(id, patch).await.map_err(|e| map_store_error(table, Op::Write, e))
}

pub(crate) async fn delete_one<K, S>(store: &S, table: &ErrorTable, id: i32) -> Result<(), RecordError>
where
    K: RecordKind,
    S: RecordStore<K> + ?Sized,
{
    store.delete(id).await.map_err(|e| map_store_error(table, Op::Delete, e))
}

/// All sub-services wired to one store and one notifier.
pub struct RecordService<S: StorageGateway + 'static, N: Notifier + ?Sized + 'static> {
    pub years: YearService<S>,
    pub disciplines: DisciplineService<S>,
    pub classes: ClassService<S>,
    pub users: UserService<S>,
    pub semesters: SemesterService<S>,
    pub grades: GradeService<S, N>,
}

impl<S: StorageGateway + 'static, N: Notifier + ?Sized + 'static> RecordService<S, N> {
    pub fn new(store: Arc<S>, notifier: Arc<N>, policy: NotificationPolicy) -> Self {
        Self {
            years: YearService::new(store.clone()),
            disciplines: DisciplineService::new(store.clone()),
            classes: ClassService::new(store.clone()),
            users: UserService::new(store.clone()),
            semesters: SemesterService::new(store.clone()),
            grades: GradeService::new(store, notifier, policy),
        }
    }
}
