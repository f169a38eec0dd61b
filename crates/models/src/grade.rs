use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{discipline, semester, user};

pub const FK_STUDENT: &str = "fk_grade_student";
pub const FK_SEMESTER: &str = "fk_grade_semester";
pub const FK_DISCIPLINE: &str = "fk_grade_discipline";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grade")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub value: f64,
    pub student_id: i32,
    pub semester_id: i32,
    pub discipline_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Student,
    Semester,
    Discipline,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Student => Entity::belongs_to(user::Entity)
                .from(Column::StudentId)
                .to(user::Column::Id)
                .into(),
            Relation::Semester => Entity::belongs_to(semester::Entity)
                .from(Column::SemesterId)
                .to(semester::Column::Id)
                .into(),
            Relation::Discipline => Entity::belongs_to(discipline::Entity)
                .from(Column::DisciplineId)
                .to(discipline::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Student.def() }
}

impl Related<semester::Entity> for Entity {
    fn to() -> RelationDef { Relation::Semester.def() }
}

impl Related<discipline::Entity> for Entity {
    fn to() -> RelationDef { Relation::Discipline.def() }
}

impl ActiveModelBehavior for ActiveModel {}
