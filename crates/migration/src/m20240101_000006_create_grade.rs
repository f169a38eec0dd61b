//! Create `grade` table referencing student, semester and discipline.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Grade::Table)
                    .if_not_exists()
                    .col(pk_auto(Grade::Id))
                    .col(double(Grade::Value).not_null())
                    .col(integer(Grade::StudentId).not_null())
                    .col(integer(Grade::SemesterId).not_null())
                    .col(integer(Grade::DisciplineId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grade_student")
                            .from(Grade::Table, Grade::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grade_semester")
                            .from(Grade::Table, Grade::SemesterId)
                            .to(Semester::Table, Semester::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grade_discipline")
                            .from(Grade::Table, Grade::DisciplineId)
                            .to(Discipline::Table, Discipline::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Grade::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Grade { Table, Id, Value, StudentId, SemesterId, DisciplineId }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Semester { Table, Id }

#[derive(DeriveIden)]
enum Discipline { Table, Id }
