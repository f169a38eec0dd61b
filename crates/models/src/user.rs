use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{class, grade};

pub const FK_CLASS: &str = "fk_user_class";

/// Account role. Stored as its upper-case name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[sea_orm(string_value = "STUDENT")]
    Student,
    #[sea_orm(string_value = "TEACHER")]
    Teacher,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: Role,
    pub class_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Class,
    Grade,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Class => Entity::belongs_to(class::Entity).from(Column::ClassId).to(class::Column::Id).into(),
            Relation::Grade => Entity::has_many(grade::Entity).into(),
        }
    }
}

impl Related<class::Entity> for Entity {
    fn to() -> RelationDef { Relation::Class.def() }
}

impl Related<grade::Entity> for Entity {
    fn to() -> RelationDef { Relation::Grade.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}
