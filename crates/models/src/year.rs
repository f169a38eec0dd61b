use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::semester;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "year")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Semester,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Semester => Entity::has_many(semester::Entity).into() }
    }
}

impl Related<semester::Entity> for Entity {
    fn to() -> RelationDef { Relation::Semester.def() }
}

impl ActiveModelBehavior for ActiveModel {}
