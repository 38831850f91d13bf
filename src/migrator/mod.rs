use sea_orm_migration::prelude::*;

mod m20251104_000001_create_account_tables;
mod m20251104_000002_create_cattles_table;
mod m20251104_000003_create_cattle_complaints_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251104_000001_create_account_tables::Migration),
            Box::new(m20251104_000002_create_cattles_table::Migration),
            Box::new(m20251104_000003_create_cattle_complaints_table::Migration),
        ]
    }
}
