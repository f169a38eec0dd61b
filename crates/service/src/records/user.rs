use std::sync::Arc;

use common::pagination::Pagination;
use tracing::{info, instrument};

use crate::domain::{NewUser, User, UserFilter, UserPatch};
use crate::errors::{ErrorTable, RecordError};
use crate::storage::{RecordStore, Users};

const TABLE: ErrorTable = ErrorTable {
    entity: "User",
    already_exists: "User Already Exists",
    references: &[("class_id", "Class Does Not Exist")],
};

/// Account records for students, teachers and admins.
pub struct UserService<S: RecordStore<Users>> {
    store: Arc<S>,
}

impl<S: RecordStore<Users>> UserService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    #[instrument(skip(self, data), fields(email = %data.email, role = ?data.role))]
    pub async fn create_one(&self, data: NewUser) -> Result<User, RecordError> {
        let created = super::create_one::<Users, S>(self.store.as_ref(), &TABLE, data).await?;
        info!(user_id = created.id, "user_created");
        Ok(created)
    }

    pub async fn get_all(&self, page: Pagination, filter: UserFilter) -> Result<Vec<User>, RecordError> {
        super::get_all::<Users, S>(self.store.as_ref(), &TABLE, page, filter).await
    }

    pub async fn get_one(&self, id: i32) -> Result<User, RecordError> {
        super::get_one::<Users, S>(self.store.as_ref(), &TABLE, id).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_one(&self, id: i32, patch: UserPatch) -> Result<User, RecordError> {
        let updated = super::update_one::<Users, S>(self.store.as_ref(), &TABLE, id, patch).await?;
        info!(user_id = id, "user_updated");
        Ok(updated)
    }

    /// Update of the caller's own account. Authorization differs at the
    /// boundary; here it is the same path as [`Self::update_one`].
    pub async fn update_self(&self, id: i32, patch: UserPatch) -> Result<User, RecordError> {
        self.update_one(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete_one(&self, id: i32) -> Result<(), RecordError> {
        super::delete_one::<Users, S>(self.store.as_ref(), &TABLE, id).await?;
        info!(user_id = id, "user_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewClass, NewDiscipline, NewGrade, NewSemester, NewYear, Role};
    use crate::errors::ErrorKind;
    use crate::storage::{Classes, Disciplines, Grades, SeaOrmStore, Semesters, Years};
    use crate::test_support::get_db;

    fn student(name: &str, class_id: Option<i32>) -> NewUser {
        NewUser { name: name.into(), email: format!("{}@school.test", name.to_lowercase()), role: Role::Student, class_id }
    }

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        let svc = UserService::new(Arc::new(SeaOrmStore::new(get_db().await?)));

        let u = svc.create_one(student("Maria", None)).await?;
        let found = svc.get_one(u.id).await?;
        assert_eq!(found.name, "Maria");
        assert_eq!(found.email, "maria@school.test");
        assert_eq!(found.role, Role::Student);

        let same = svc.update_one(u.id, UserPatch::default()).await?;
        assert_eq!(same, u);

        let promoted = svc.update_one(u.id, UserPatch { role: Some(Role::Teacher), ..Default::default() }).await?;
        assert_eq!(promoted.role, Role::Teacher);
        assert_eq!(promoted.email, u.email);

        let renamed = svc.update_self(u.id, UserPatch { name: Some("Maria P.".into()), ..Default::default() }).await?;
        assert_eq!(renamed.name, "Maria P.");
        assert_eq!(renamed.role, Role::Teacher);

        svc.delete_one(u.id).await?;
        assert_eq!(svc.get_one(u.id).await.unwrap_err(), RecordError::NotFound("User Not Found".into()));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_already_exists() -> Result<(), anyhow::Error> {
        let svc = UserService::new(Arc::new(SeaOrmStore::new(get_db().await?)));
        svc.create_one(student("Dan", None)).await?;
        let err = svc.create_one(student("Dan", None)).await.unwrap_err();
        assert_eq!(err, RecordError::AlreadyExists("User Already Exists".into()));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_class_is_related_entity_missing() -> Result<(), anyhow::Error> {
        let svc = UserService::new(Arc::new(SeaOrmStore::new(get_db().await?)));
        let err = svc.create_one(student("Eva", Some(31))).await.unwrap_err();
        assert_eq!(err, RecordError::RelatedEntityMissing("Class Does Not Exist".into()));
        assert!(svc.get_all(Pagination::default(), UserFilter::default()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_by_role_and_class() -> Result<(), anyhow::Error> {
        let store = Arc::new(SeaOrmStore::new(get_db().await?));
        let svc = UserService::new(store.clone());
        let c = RecordStore::<Classes>::create(store.as_ref(), NewClass { name: "7A".into() }).await?;

        let a = svc.create_one(student("Ana", Some(c.id))).await?;
        svc.create_one(student("Bogdan", None)).await?;
        svc.create_one(NewUser { name: "Teo".into(), email: "teo@school.test".into(), role: Role::Teacher, class_id: Some(c.id) }).await?;

        let students_in_class = svc
            .get_all(Pagination::default(), UserFilter { role: Some(Role::Student), class_id: Some(c.id) })
            .await?;
        assert_eq!(students_in_class, vec![a]);

        let teachers = svc.get_all(Pagination::default(), UserFilter { role: Some(Role::Teacher), class_id: None }).await?;
        assert_eq!(teachers.len(), 1);

        let err = svc.update_one(999, UserPatch::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn email_taken_by_another_user_already_exists() -> Result<(), anyhow::Error> {
        let svc = UserService::new(Arc::new(SeaOrmStore::new(get_db().await?)));
        let dan = svc.create_one(student("Dan", None)).await?;
        let ioana = svc.create_one(student("Ioana", None)).await?;

        let err = svc
            .update_one(ioana.id, UserPatch { email: Some(dan.email.clone()), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err, RecordError::AlreadyExists("User Already Exists".into()));
        assert_eq!(svc.get_one(ioana.id).await?.email, "ioana@school.test");
        Ok(())
    }

    #[tokio::test]
    async fn class_can_be_cleared_or_changed() -> Result<(), anyhow::Error> {
        let store = Arc::new(SeaOrmStore::new(get_db().await?));
        let svc = UserService::new(store.clone());
        let c = RecordStore::<Classes>::create(store.as_ref(), NewClass { name: "8B".into() }).await?;
        let u = svc.create_one(student("Luca", Some(c.id))).await?;

        let err = svc.update_one(u.id, UserPatch { class_id: Some(Some(404)), ..Default::default() }).await.unwrap_err();
        assert_eq!(err, RecordError::RelatedEntityMissing("Class Does Not Exist".into()));

        let renamed = svc.update_one(u.id, UserPatch { name: Some("Luca M.".into()), ..Default::default() }).await?;
        assert_eq!(renamed.class_id, Some(c.id));

        let cleared = svc.update_one(u.id, UserPatch { class_id: Some(None), ..Default::default() }).await?;
        assert_eq!(cleared.class_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn graded_student_cannot_be_deleted() -> Result<(), anyhow::Error> {
        let store = Arc::new(SeaOrmStore::new(get_db().await?));
        let svc = UserService::new(store.clone());
        let s = store.as_ref();

        let u = svc.create_one(student("Radu", None)).await?;
        let y = RecordStore::<Years>::create(s, NewYear { name: "2025".into() }).await?;
        let sem = RecordStore::<Semesters>::create(s, NewSemester { name: "Spring".into(), year_id: y.id }).await?;
        let d = RecordStore::<Disciplines>::create(s, NewDiscipline { name: "Physics".into() }).await?;
        RecordStore::<Grades>::create(
            s,
            NewGrade { value: 8.5, student_id: u.id, semester_id: sem.semester.id, discipline_id: d.id },
        )
        .await?;

        let err = svc.delete_one(u.id).await.unwrap_err();
        assert_eq!(err, RecordError::DependencyConflict("Foreign Key Violation".into()));
        assert_eq!(svc.get_one(u.id).await?, u);
        Ok(())
    }
}
