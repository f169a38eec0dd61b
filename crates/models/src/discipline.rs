use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grade;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discipline")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Grade }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Grade => Entity::has_many(grade::Entity).into() }
    }
}

impl Related<grade::Entity> for Entity {
    fn to() -> RelationDef { Relation::Grade.def() }
}

impl ActiveModelBehavior for ActiveModel {}
