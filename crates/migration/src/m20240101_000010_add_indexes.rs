use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Semester: one name per year
        manager
            .create_index(
                Index::create()
                    .name("uniq_semester_year_name")
                    .table(Semester::Table)
                    .col(Semester::YearId)
                    .col(Semester::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Grade: filtered by any combination of these
        manager
            .create_index(
                Index::create()
                    .name("idx_grade_student")
                    .table(Grade::Table)
                    .col(Grade::StudentId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_grade_semester")
                    .table(Grade::Table)
                    .col(Grade::SemesterId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_grade_discipline")
                    .table(Grade::Table)
                    .col(Grade::DisciplineId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_class")
                    .table(User::Table)
                    .col(User::ClassId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_semester_year_name").table(Semester::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_grade_student").table(Grade::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_grade_semester").table(Grade::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_grade_discipline").table(Grade::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_class").table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Semester { Table, YearId, Name }

#[derive(DeriveIden)]
enum Grade { Table, StudentId, SemesterId, DisciplineId }

#[derive(DeriveIden)]
enum User { Table, ClassId }
