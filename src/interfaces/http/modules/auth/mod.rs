//! Authentication module: signup, login, profile management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
