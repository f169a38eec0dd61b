use std::sync::Arc;

use common::pagination::Pagination;
use tracing::{info, instrument};

use crate::domain::{NewSemester, SemesterDetails, SemesterFilter, SemesterPatch};
use crate::errors::{ErrorTable, RecordError};
use crate::storage::{RecordStore, Semesters};

/// Year existence is left to the store's foreign key.
const TABLE: ErrorTable = ErrorTable {
    entity: "Semester",
    already_exists: "Semester Already Exists",
    references: &[("year_id", "Year Does Not Exist")],
};

pub struct SemesterService<S: RecordStore<Semesters>> {
    store: Arc<S>,
}

impl<S: RecordStore<Semesters>> SemesterService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    #[instrument(skip(self, data), fields(year_id = data.year_id))]
    pub async fn create_one(&self, data: NewSemester) -> Result<SemesterDetails, RecordError> {
        let created = super::create_one::<Semesters, S>(self.store.as_ref(), &TABLE, data).await?;
        info!(semester_id = created.semester.id, "semester_created");
        Ok(created)
    }

    pub async fn get_all(&self, page: Pagination, filter: SemesterFilter) -> Result<Vec<SemesterDetails>, RecordError> {
        super::get_all::<Semesters, S>(self.store.as_ref(), &TABLE, page, filter).await
    }

    pub async fn get_one(&self, id: i32) -> Result<SemesterDetails, RecordError> {
        super::get_one::<Semesters, S>(self.store.as_ref(), &TABLE, id).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_one(&self, id: i32, patch: SemesterPatch) -> Result<SemesterDetails, RecordError> {
        let updated = super::update_one::<Semesters, S>(self.store.as_ref(), &TABLE, id, patch).await?;
        info!(semester_id = id, "semester_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_one(&self, id: i32) -> Result<(), RecordError> {
        super::delete_one::<Semesters, S>(self.store.as_ref(), &TABLE, id).await?;
        info!(semester_id = id, "semester_deleted");
        Ok(())
    }
}
