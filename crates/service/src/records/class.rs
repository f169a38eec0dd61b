use std::sync::Arc;

use common::pagination::Pagination;
use models::class;
use tracing::{info, instrument};

use crate::domain::{ClassPatch, NewClass};
use crate::errors::{ErrorTable, RecordError};
use crate::storage::{Classes, RecordStore};

const TABLE: ErrorTable = ErrorTable::named("Class", "Class Already Exists");

/// Classes: unique by name, no outgoing references.
pub struct ClassService<S: RecordStore<Classes>> {
    store: Arc<S>,
}

impl<S: RecordStore<Classes>> ClassService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    #[instrument(skip(self, data), fields(name = %data.name))]
    pub async fn create_one(&self, data: NewClass) -> Result<class::Model, RecordError> {
        let created = super::create_one::<Classes, S>(self.store.as_ref(), &TABLE, data).await?;
        info!(class_id = created.id, "class_created");
        Ok(created)
    }

    pub async fn get_all(&self, page: Pagination) -> Result<Vec<class::Model>, RecordError> {
        super::get_all::<Classes, S>(self.store.as_ref(), &TABLE, page, ()).await
    }

    pub async fn get_one(&self, id: i32) -> Result<class::Model, RecordError> {
        super::get_one::<Classes, S>(self.store.as_ref(), &TABLE, id).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_one(&self, id: i32, patch: ClassPatch) -> Result<class::Model, RecordError> {
        let updated = super::update_one::<Classes, S>(self.store.as_ref(), &TABLE, id, patch).await?;
        info!(class_id = id, "class_updated");
        Ok(updated)
    }

    /// Fails with `DependencyConflict` while users are still assigned to the class.
    #[instrument(skip(self))]
    pub async fn delete_one(&self, id: i32) -> Result<(), RecordError> {
        super::delete_one::<Classes, S>(self.store.as_ref(), &TABLE, id).await?;
        info!(class_id = id, "class_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewUser, Role};
    use crate::errors::ErrorKind;
    use crate::storage::{SeaOrmStore, Users};
    use crate::test_support::get_db;
    use common::pagination::SortOrder;

    async fn service() -> Result<(ClassService<SeaOrmStore>, Arc<SeaOrmStore>), anyhow::Error> {
        let store = Arc::new(SeaOrmStore::new(get_db().await?));
        Ok((ClassService::new(store.clone()), store))
    }

    #[tokio::test]
    async fn class_crud_service() -> Result<(), anyhow::Error> {
        let (svc, _) = service().await?;

        let c = svc.create_one(NewClass { name: "9A".into() }).await?;
        let found = svc.get_one(c.id).await?;
        assert_eq!(found, c);

        let unchanged = svc.update_one(c.id, ClassPatch::default()).await?;
        assert_eq!(unchanged, c);

        let renamed = svc.update_one(c.id, ClassPatch { name: Some("9B".into()) }).await?;
        assert_eq!(renamed.name, "9B");
        assert_eq!(renamed.id, c.id);

        svc.delete_one(c.id).await?;
        let err = svc.get_one(c.id).await.unwrap_err();
        assert_eq!(err, RecordError::NotFound("Class Not Found".into()));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_already_exists() -> Result<(), anyhow::Error> {
        let (svc, _) = service().await?;
        svc.create_one(NewClass { name: "10C".into() }).await?;
        let err = svc.create_one(NewClass { name: "10C".into() }).await.unwrap_err();
        assert_eq!(err, RecordError::AlreadyExists("Class Already Exists".into()));
        assert_eq!(svc.get_all(Pagination::default()).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn rename_onto_existing_name_already_exists() -> Result<(), anyhow::Error> {
        let (svc, _) = service().await?;
        svc.create_one(NewClass { name: "11A".into() }).await?;
        let b = svc.create_one(NewClass { name: "11B".into() }).await?;
        let err = svc.update_one(b.id, ClassPatch { name: Some("11A".into()) }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        Ok(())
    }

    #[tokio::test]
    async fn missing_class_update_and_delete_not_found() -> Result<(), anyhow::Error> {
        let (svc, _) = service().await?;
        let err = svc.update_one(404, ClassPatch { name: Some("x".into()) }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = svc.delete_one(404).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn delete_with_members_is_dependency_conflict() -> Result<(), anyhow::Error> {
        let (svc, store) = service().await?;
        let c = svc.create_one(NewClass { name: "12A".into() }).await?;
        RecordStore::<Users>::create(
            store.as_ref(),
            NewUser { name: "Ana".into(), email: "ana@school.test".into(), role: Role::Student, class_id: Some(c.id) },
        )
        .await?;

        let err = svc.delete_one(c.id).await.unwrap_err();
        assert_eq!(err, RecordError::DependencyConflict("Foreign Key Violation".into()));
        assert_eq!(svc.get_one(c.id).await?, c);
        Ok(())
    }

    #[tokio::test]
    async fn pagination_skip_and_take() -> Result<(), anyhow::Error> {
        let (svc, _) = service().await?;
        let mut created = Vec::new();
        for name in ["5A", "5B", "5C", "5D", "5E"] {
            created.push(svc.create_one(NewClass { name: name.into() }).await?);
        }

        let page = svc.get_all(Pagination::new(2, 1, SortOrder::Asc)).await?;
        assert_eq!(page, vec![created[2].clone()]);

        let desc = svc.get_all(Pagination::new(0, 2, SortOrder::Desc)).await?;
        assert_eq!(desc, vec![created[4].clone(), created[3].clone()]);
        Ok(())
    }
}
