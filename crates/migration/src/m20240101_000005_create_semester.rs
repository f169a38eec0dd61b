//! Create `semester` table with FK to `year`.
//!
//! Deleting a year is refused while semesters reference it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Semester::Table)
                    .if_not_exists()
                    .col(pk_auto(Semester::Id))
                    .col(string_len(Semester::Name, 64).not_null())
                    .col(integer(Semester::YearId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_semester_year")
                            .from(Semester::Table, Semester::YearId)
                            .to(Year::Table, Year::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Semester::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Semester { Table, Id, Name, YearId }

#[derive(DeriveIden)]
enum Year { Table, Id }
