use std::collections::HashMap;

use async_trait::async_trait;
use common::pagination::{Pagination, SortOrder};
use models::{class, discipline, grade, semester, user, year};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set, SqlErr,
};
use tracing::debug;

use super::{
    Classes, ConstraintViolation, Disciplines, Grades, ListQuery, RecordStore, Semesters, StoreError, Users, Years,
};
use crate::domain::{
    ClassPatch, DisciplinePatch, GradeDetails, GradeFilter, GradePatch, NewClass, NewDiscipline, NewGrade,
    NewSemester, NewUser, NewYear, SemesterDetails, SemesterFilter, SemesterPatch, UserFilter, UserPatch, YearPatch,
};

/// SeaORM-backed storage gateway. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// A parent row that a write references.
#[derive(Debug, Clone, Copy)]
enum Parent {
    Year(i32),
    Class(i32),
    Student(i32),
    Semester(i32),
    Discipline(i32),
}

impl Parent {
    fn field(self) -> &'static str {
        match self {
            Parent::Year(_) => "year_id",
            Parent::Class(_) => "class_id",
            Parent::Student(_) => "student_id",
            Parent::Semester(_) => "semester_id",
            Parent::Discipline(_) => "discipline_id",
        }
    }

    fn constraint(self) -> &'static str {
        match self {
            Parent::Year(_) => semester::FK_YEAR,
            Parent::Class(_) => user::FK_CLASS,
            Parent::Student(_) => grade::FK_STUDENT,
            Parent::Semester(_) => grade::FK_SEMESTER,
            Parent::Discipline(_) => grade::FK_DISCIPLINE,
        }
    }

    async fn exists(self, db: &DatabaseConnection) -> Result<bool, DbErr> {
        let found = match self {
            Parent::Year(id) => year::Entity::find_by_id(id).one(db).await?.is_some(),
            Parent::Class(id) => class::Entity::find_by_id(id).one(db).await?.is_some(),
            Parent::Student(id) => user::Entity::find_by_id(id).one(db).await?.is_some(),
            Parent::Semester(id) => semester::Entity::find_by_id(id).one(db).await?.is_some(),
            Parent::Discipline(id) => discipline::Entity::find_by_id(id).one(db).await?.is_some(),
        };
        Ok(found)
    }
}

fn backend(e: DbErr) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn order(page: &Pagination) -> Order {
    match page.order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

impl SeaOrmStore {
    /// Turn a driver error into a structured violation where possible.
    ///
    /// Postgres names the violated constraint in its message; SQLite does
    /// not, so the referenced parents are probed to find the missing one.
    async fn classify(&self, err: DbErr, unique: &[&'static str], parents: &[Parent]) -> StoreError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                let field = unique.iter().copied().find(|f| msg.contains(f));
                debug!(?field, %msg, "unique constraint violated");
                StoreError::Violation(ConstraintViolation::unique(field))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                let field = match parents.iter().find(|p| msg.contains(p.constraint())) {
                    Some(p) => Some(p.field()),
                    None => self.missing_parent(parents).await,
                };
                debug!(?field, %msg, "foreign key constraint violated");
                StoreError::Violation(ConstraintViolation::foreign_key(field))
            }
            _ => backend(err),
        }
    }

    async fn missing_parent(&self, parents: &[Parent]) -> Option<&'static str> {
        for parent in parents {
            match parent.exists(&self.db).await {
                Ok(true) => continue,
                Ok(false) => return Some(parent.field()),
                Err(e) => {
                    debug!(error = %e, "probe for missing parent failed");
                    return None;
                }
            }
        }
        None
    }

    async fn delete_outcome(&self, res: Result<sea_orm::DeleteResult, DbErr>) -> Result<(), StoreError> {
        match res {
            Ok(r) if r.rows_affected == 0 => Err(StoreError::NotFound),
            Ok(_) => Ok(()),
            Err(e) => Err(self.classify(e, &[], &[]).await),
        }
    }

    async fn semester_details(&self, s: semester::Model) -> Result<SemesterDetails, StoreError> {
        let y = year::Entity::find_by_id(s.year_id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend(format!("semester {} references missing year {}", s.id, s.year_id)))?;
        Ok(SemesterDetails { semester: s, year: y })
    }

    /// Attach discipline and semester (with year) to each grade row, batching lookups.
    async fn grade_details(&self, rows: Vec<grade::Model>) -> Result<Vec<GradeDetails>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let semester_ids: Vec<i32> = rows.iter().map(|g| g.semester_id).collect();
        let discipline_ids: Vec<i32> = rows.iter().map(|g| g.discipline_id).collect();

        let semesters: HashMap<i32, SemesterDetails> = semester::Entity::find()
            .filter(semester::Column::Id.is_in(semester_ids))
            .find_also_related(year::Entity)
            .all(&self.db)
            .await
            .map_err(backend)?
            .into_iter()
            .filter_map(|(s, y)| y.map(|y| (s.id, SemesterDetails { semester: s, year: y })))
            .collect();
        let disciplines: HashMap<i32, discipline::Model> = discipline::Entity::find()
            .filter(discipline::Column::Id.is_in(discipline_ids))
            .all(&self.db)
            .await
            .map_err(backend)?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        rows.into_iter()
            .map(|g| {
                let semester = semesters
                    .get(&g.semester_id)
                    .cloned()
                    .ok_or_else(|| StoreError::Backend(format!("grade {} has dangling semester", g.id)))?;
                let discipline = disciplines
                    .get(&g.discipline_id)
                    .cloned()
                    .ok_or_else(|| StoreError::Backend(format!("grade {} has dangling discipline", g.id)))?;
                Ok(GradeDetails { grade: g, discipline, semester })
            })
            .collect()
    }

    async fn one_grade(&self, row: grade::Model) -> Result<GradeDetails, StoreError> {
        self.grade_details(vec![row])
            .await?
            .pop()
            .ok_or_else(|| StoreError::Backend("grade details lost".into()))
    }
}

/// Year, Discipline and Class share one shape: an id and a unique name.
macro_rules! named_record_store {
    ($kind:ty, $entity:ident, $new:ty, $patch:ty) => {
        #[async_trait]
        impl RecordStore<$kind> for SeaOrmStore {
            async fn find(&self, id: i32) -> Result<Option<$entity::Model>, StoreError> {
                $entity::Entity::find_by_id(id).one(&self.db).await.map_err(backend)
            }

            async fn find_many(&self, query: &ListQuery<()>) -> Result<Vec<$entity::Model>, StoreError> {
                let (skip, take) = query.page.normalize();
                $entity::Entity::find()
                    .order_by($entity::Column::Id, order(&query.page))
                    .offset(skip)
                    .limit(take)
                    .all(&self.db)
                    .await
                    .map_err(backend)
            }

            async fn create(&self, data: $new) -> Result<$entity::Model, StoreError> {
                let am = $entity::ActiveModel { name: Set(data.name), ..Default::default() };
                match am.insert(&self.db).await {
                    Ok(m) => Ok(m),
                    Err(e) => Err(self.classify(e, &["name"], &[]).await),
                }
            }

            async fn update(&self, id: i32, patch: $patch) -> Result<$entity::Model, StoreError> {
                let found = $entity::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(backend)?
                    .ok_or(StoreError::NotFound)?;
                let mut am: $entity::ActiveModel = found.clone().into();
                if let Some(name) = patch.name { am.name = Set(name); }
                if !am.is_changed() {
                    return Ok(found);
                }
                match am.update(&self.db).await {
                    Ok(m) => Ok(m),
                    Err(e) => Err(self.classify(e, &["name"], &[]).await),
                }
            }

            async fn delete(&self, id: i32) -> Result<(), StoreError> {
                let res = $entity::Entity::delete_by_id(id).exec(&self.db).await;
                self.delete_outcome(res).await
            }
        }
    };
}

named_record_store!(Years, year, NewYear, YearPatch);
named_record_store!(Disciplines, discipline, NewDiscipline, DisciplinePatch);
named_record_store!(Classes, class, NewClass, ClassPatch);

#[async_trait]
impl RecordStore<Users> for SeaOrmStore {
    async fn find(&self, id: i32) -> Result<Option<user::Model>, StoreError> {
        user::Entity::find_by_id(id).one(&self.db).await.map_err(backend)
    }

    async fn find_many(&self, query: &ListQuery<UserFilter>) -> Result<Vec<user::Model>, StoreError> {
        let (skip, take) = query.page.normalize();
        let f = query.filter;
        user::Entity::find()
            .apply_if(f.role, |q, role| q.filter(user::Column::Role.eq(role)))
            .apply_if(f.class_id, |q, class_id| q.filter(user::Column::ClassId.eq(class_id)))
            .order_by(user::Column::Id, order(&query.page))
            .offset(skip)
            .limit(take)
            .all(&self.db)
            .await
            .map_err(backend)
    }

    async fn create(&self, data: NewUser) -> Result<user::Model, StoreError> {
        let parents: Vec<Parent> = data.class_id.map(Parent::Class).into_iter().collect();
        let am = user::ActiveModel {
            name: Set(data.name),
            email: Set(data.email),
            role: Set(data.role),
            class_id: Set(data.class_id),
            ..Default::default()
        };
        match am.insert(&self.db).await {
            Ok(m) => Ok(m),
            Err(e) => Err(self.classify(e, &["email"], &parents).await),
        }
    }

    async fn update(&self, id: i32, patch: UserPatch) -> Result<user::Model, StoreError> {
        let found = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or(StoreError::NotFound)?;
        let parents: Vec<Parent> = patch.class_id.flatten().map(Parent::Class).into_iter().collect();
        let mut am: user::ActiveModel = found.clone().into();
        if let Some(name) = patch.name { am.name = Set(name); }
        if let Some(email) = patch.email { am.email = Set(email); }
        if let Some(role) = patch.role { am.role = Set(role); }
        if let Some(class_id) = patch.class_id { am.class_id = Set(class_id); }
        if !am.is_changed() {
            return Ok(found);
        }
        match am.update(&self.db).await {
            Ok(m) => Ok(m),
            Err(e) => Err(self.classify(e, &["email"], &parents).await),
        }
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let res = user::Entity::delete_by_id(id).exec(&self.db).await;
        self.delete_outcome(res).await
    }
}

#[async_trait]
impl RecordStore<Semesters> for SeaOrmStore {
    async fn find(&self, id: i32) -> Result<Option<SemesterDetails>, StoreError> {
        let found = semester::Entity::find_by_id(id)
            .find_also_related(year::Entity)
            .one(&self.db)
            .await
            .map_err(backend)?;
        match found {
            Some((s, Some(y))) => Ok(Some(SemesterDetails { semester: s, year: y })),
            Some((s, None)) => Err(StoreError::Backend(format!("semester {} references missing year", s.id))),
            None => Ok(None),
        }
    }

    async fn find_many(&self, query: &ListQuery<SemesterFilter>) -> Result<Vec<SemesterDetails>, StoreError> {
        let (skip, take) = query.page.normalize();
        let rows = semester::Entity::find()
            .apply_if(query.filter.year_id, |q, year_id| q.filter(semester::Column::YearId.eq(year_id)))
            .order_by(semester::Column::Id, order(&query.page))
            .offset(skip)
            .limit(take)
            .find_also_related(year::Entity)
            .all(&self.db)
            .await
            .map_err(backend)?;
        rows.into_iter()
            .map(|(s, y)| match y {
                Some(y) => Ok(SemesterDetails { semester: s, year: y }),
                None => Err(StoreError::Backend(format!("semester {} references missing year", s.id))),
            })
            .collect()
    }

    async fn create(&self, data: NewSemester) -> Result<SemesterDetails, StoreError> {
        let parents = [Parent::Year(data.year_id)];
        let am = semester::ActiveModel { name: Set(data.name), year_id: Set(data.year_id), ..Default::default() };
        let created = match am.insert(&self.db).await {
            Ok(m) => m,
            Err(e) => return Err(self.classify(e, &["name"], &parents).await),
        };
        self.semester_details(created).await
    }

    async fn update(&self, id: i32, patch: SemesterPatch) -> Result<SemesterDetails, StoreError> {
        let found = semester::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or(StoreError::NotFound)?;
        let parents: Vec<Parent> = patch.year_id.map(Parent::Year).into_iter().collect();
        let mut am: semester::ActiveModel = found.clone().into();
        if let Some(name) = patch.name { am.name = Set(name); }
        if let Some(year_id) = patch.year_id { am.year_id = Set(year_id); }
        if !am.is_changed() {
            return self.semester_details(found).await;
        }
        let updated = match am.update(&self.db).await {
            Ok(m) => m,
            Err(e) => return Err(self.classify(e, &["name"], &parents).await),
        };
        self.semester_details(updated).await
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let res = semester::Entity::delete_by_id(id).exec(&self.db).await;
        self.delete_outcome(res).await
    }
}

#[async_trait]
impl RecordStore<Grades> for SeaOrmStore {
    async fn find(&self, id: i32) -> Result<Option<GradeDetails>, StoreError> {
        match grade::Entity::find_by_id(id).one(&self.db).await.map_err(backend)? {
            Some(row) => Ok(Some(self.one_grade(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_many(&self, query: &ListQuery<GradeFilter>) -> Result<Vec<GradeDetails>, StoreError> {
        let (skip, take) = query.page.normalize();
        let f = query.filter;
        let rows = grade::Entity::find()
            .apply_if(f.student_id, |q, v| q.filter(grade::Column::StudentId.eq(v)))
            .apply_if(f.semester_id, |q, v| q.filter(grade::Column::SemesterId.eq(v)))
            .apply_if(f.discipline_id, |q, v| q.filter(grade::Column::DisciplineId.eq(v)))
            .order_by(grade::Column::Id, order(&query.page))
            .offset(skip)
            .limit(take)
            .all(&self.db)
            .await
            .map_err(backend)?;
        self.grade_details(rows).await
    }

    async fn create(&self, data: NewGrade) -> Result<GradeDetails, StoreError> {
        let parents = [
            Parent::Student(data.student_id),
            Parent::Semester(data.semester_id),
            Parent::Discipline(data.discipline_id),
        ];
        let am = grade::ActiveModel {
            value: Set(data.value),
            student_id: Set(data.student_id),
            semester_id: Set(data.semester_id),
            discipline_id: Set(data.discipline_id),
            ..Default::default()
        };
        let created = match am.insert(&self.db).await {
            Ok(m) => m,
            Err(e) => return Err(self.classify(e, &[], &parents).await),
        };
        self.one_grade(created).await
    }

    async fn update(&self, id: i32, patch: GradePatch) -> Result<GradeDetails, StoreError> {
        let found = grade::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or(StoreError::NotFound)?;
        let parents: Vec<Parent> = [
            patch.student_id.map(Parent::Student),
            patch.semester_id.map(Parent::Semester),
            patch.discipline_id.map(Parent::Discipline),
        ]
        .into_iter()
        .flatten()
        .collect();
        let mut am: grade::ActiveModel = found.clone().into();
        if let Some(value) = patch.value { am.value = Set(value); }
        if let Some(v) = patch.student_id { am.student_id = Set(v); }
        if let Some(v) = patch.semester_id { am.semester_id = Set(v); }
        if let Some(v) = patch.discipline_id { am.discipline_id = Set(v); }
        if !am.is_changed() {
            return self.one_grade(found).await;
        }
        let updated = match am.update(&self.db).await {
            Ok(m) => m,
            Err(e) => return Err(self.classify(e, &[], &parents).await),
        };
        self.one_grade(updated).await
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let res = grade::Entity::delete_by_id(id).exec(&self.db).await;
        self.delete_outcome(res).await
    }
}
