use std::sync::Arc;

use common::pagination::Pagination;
use models::discipline;
use tracing::{info, instrument};

use crate::domain::{DisciplinePatch, NewDiscipline};
use crate::errors::{ErrorTable, RecordError};
use crate::storage::{Disciplines, RecordStore};

const TABLE: ErrorTable = ErrorTable::named("Discipline", "Discipline Already Exists");

pub struct DisciplineService<S: RecordStore<Disciplines>> {
    store: Arc<S>,
}

impl<S: RecordStore<Disciplines>> DisciplineService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    #[instrument(skip(self, data), fields(name = %data.name))]
    pub async fn create_one(&self, data: NewDiscipline) -> Result<discipline::Model, RecordError> {
        let created = super::create_one::<Disciplines, S>(self.store.as_ref(), &TABLE, data).await?;
        info!(discipline_id = created.id, "discipline_created");
        Ok(created)
    }

    pub async fn get_all(&self, page: Pagination) -> Result<Vec<discipline::Model>, RecordError> {
        super::get_all::<Disciplines, S>(self.store.as_ref(), &TABLE, page, ()).await
    }

    pub async fn get_one(&self, id: i32) -> Result<discipline::Model, RecordError> {
        super::get_one::<Disciplines, S>(self.store.as_ref(), &TABLE, id).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_one(&self, id: i32, patch: DisciplinePatch) -> Result<discipline::Model, RecordError> {
        let updated = super::update_one::<Disciplines, S>(self.store.as_ref(), &TABLE, id, patch).await?;
        info!(discipline_id = id, "discipline_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_one(&self, id: i32) -> Result<(), RecordError> {
        super::delete_one::<Disciplines, S>(self.store.as_ref(), &TABLE, id).await?;
        info!(discipline_id = id, "discipline_deleted");
        Ok(())
    }
}
