//! Park & Ride reservation service.
//!
//! REST backend for a parking-and-ride-hailing application: parking location
//! search with per-slot availability, slot bookings with a
//! one-active-booking-per-user rule, and ride quoting with a fixed status
//! lifecycle. Configuration is read from a TOML file
//! (`~/.config/parkride/config.toml`).

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::create_api_router;
