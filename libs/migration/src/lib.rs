pub use sea_orm_migration::prelude::*;

mod m20261014_000001_create_restaurants;
mod m20261014_000002_create_categories;
mod m20261014_000003_create_dishes;
mod m20261014_000004_create_products;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261014_000001_create_restaurants::Migration),
            Box::new(m20261014_000002_create_categories::Migration),
            Box::new(m20261014_000003_create_dishes::Migration),
            Box::new(m20261014_000004_create_products::Migration),
        ]
    }
}
