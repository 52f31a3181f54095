//! Core business entities, invariants and repository traits

pub mod error;
pub mod geo;
pub mod parking;
pub mod repositories;
pub mod ride;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use geo::GeoPoint;
pub use repositories::RepositoryProvider;
