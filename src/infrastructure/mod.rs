//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;

pub use database::{init_database, DatabaseConfig};
pub use database::repositories::SeaOrmRepositoryProvider;
