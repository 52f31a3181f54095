pub mod model;
pub mod repository;

pub use model::{ProfileUpdate, User};
pub use repository::UserRepository;
