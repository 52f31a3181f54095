//! HTTP REST API interfaces
//!
//! - `common`: response envelope, pagination, validated JSON, error mapping
//! - `middleware`: JWT authentication middleware
//! - `modules`: per-resource DTOs and handlers
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
