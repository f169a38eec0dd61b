use std::sync::Arc;

use common::pagination::Pagination;
use models::year;
use tracing::{info, instrument};

use crate::domain::{NewYear, YearPatch};
use crate::errors::{ErrorTable, RecordError};
use crate::storage::{RecordStore, Years};

const TABLE: ErrorTable = ErrorTable::named("Year", "Year Already Exists");

pub struct YearService<S: RecordStore<Years>> {
    store: Arc<S>,
}

impl<S: RecordStore<Years>> YearService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    #[instrument(skip(self, data), fields(name = %data.name))]
    pub async fn create_one(&self, data: NewYear) -> Result<year::Model, RecordError> {
        let created = super::create_one::<Years, S>(self.store.as_ref(), &TABLE, data).await?;
        info!(year_id = created.id, "year_created");
        Ok(created)
    }

    pub async fn get_all(&self, page: Pagination) -> Result<Vec<year::Model>, RecordError> {
        super::get_all::<Years, S>(self.store.as_ref(), &TABLE, page, ()).await
    }

    pub async fn get_one(&self, id: i32) -> Result<year::Model, RecordError> {
        super::get_one::<Years, S>(self.store.as_ref(), &TABLE, id).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_one(&self, id: i32, patch: YearPatch) -> Result<year::Model, RecordError> {
        let updated = super::update_one::<Years, S>(self.store.as_ref(), &TABLE, id, patch).await?;
        info!(year_id = id, "year_updated");
        Ok(updated)
    }

    /// Refused with `DependencyConflict` while semesters belong to the year.
    #[instrument(skip(self))]
    pub async fn delete_one(&self, id: i32) -> Result<(), RecordError> {
        super::delete_one::<Years, S>(self.store.as_ref(), &TABLE, id).await?;
        info!(year_id = id, "year_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewSemester;
    use crate::errors::ErrorKind;
    use crate::storage::{SeaOrmStore, Semesters};
    use crate::test_support::get_db;

    #[tokio::test]
    async fn year_referenced_by_semester_cannot_be_deleted() -> Result<(), anyhow::Error> {
        let store = Arc::new(SeaOrmStore::new(get_db().await?));
        let svc = YearService::new(store.clone());

        let y = svc.create_one(NewYear { name: "2022/2023".into() }).await?;
        RecordStore::<Semesters>::create(store.as_ref(), NewSemester { name: "Autumn".into(), year_id: y.id }).await?;

        let err = svc.delete_one(y.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DependencyConflict);
        assert_eq!(svc.get_one(y.id).await?, y);
        Ok(())
    }

    #[tokio::test]
    async fn unreferenced_year_is_deleted() -> Result<(), anyhow::Error> {
        let store = Arc::new(SeaOrmStore::new(get_db().await?));
        let svc = YearService::new(store);

        let y = svc.create_one(NewYear { name: "2030".into() }).await?;
        svc.delete_one(y.id).await?;
        assert_eq!(svc.get_one(y.id).await.unwrap_err(), RecordError::NotFound("Year Not Found".into()));
        Ok(())
    }

    #[tokio::test]
    async fn oversized_skip_yields_empty_page() -> Result<(), anyhow::Error> {
        let svc = YearService::new(Arc::new(SeaOrmStore::new(get_db().await?)));
        svc.create_one(NewYear { name: "2031".into() }).await?;

        let page = Pagination::new(u64::MAX, 1, common::pagination::SortOrder::Asc);
        assert!(svc.get_all(page).await?.is_empty());
        Ok(())
    }
}
