//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod parking_repository;
pub mod repository_provider;
pub mod ride_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
