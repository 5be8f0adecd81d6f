pub use sea_orm_migration::prelude::*;

mod m20251210_000001_create_member_table;
mod m20251212_000002_add_discord_link_to_member;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251210_000001_create_member_table::Migration),
            Box::new(m20251212_000002_add_discord_link_to_member::Migration),
        ]
    }
}
