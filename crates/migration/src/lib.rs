//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_year;
mod m20240101_000002_create_discipline;
mod m20240101_000003_create_class;
mod m20240101_000004_create_user;
mod m20240101_000005_create_semester;
mod m20240101_000006_create_grade;
mod m20240101_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_year::Migration),
            Box::new(m20240101_000002_create_discipline::Migration),
            Box::new(m20240101_000003_create_class::Migration),
            Box::new(m20240101_000004_create_user::Migration),
            Box::new(m20240101_000005_create_semester::Migration),
            Box::new(m20240101_000006_create_grade::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000010_add_indexes::Migration),
        ]
    }
}
