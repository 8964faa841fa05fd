pub use sea_orm_migration::prelude::*;

mod m20241102_093010_create_users_table;
mod m20241102_094522_create_books_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241102_093010_create_users_table::Migration),
            Box::new(m20241102_094522_create_books_table::Migration),
        ]
    }
}
