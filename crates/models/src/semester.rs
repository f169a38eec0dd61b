use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{grade, year};

/// Name of the foreign key from `semester.year_id` to `year.id`.
pub const FK_YEAR: &str = "fk_semester_year";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "semester")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub year_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Year,
    Grade,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Year => Entity::belongs_to(year::Entity)
                .from(Column::YearId)
                .to(year::Column::Id)
                .into(),
            Relation::Grade => Entity::has_many(grade::Entity).into(),
        }
    }
}

impl Related<year::Entity> for Entity {
    fn to() -> RelationDef { Relation::Year.def() }
}

impl Related<grade::Entity> for Entity {
    fn to() -> RelationDef { Relation::Grade.def() }
}

impl ActiveModelBehavior for ActiveModel {}
