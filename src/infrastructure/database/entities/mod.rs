pub mod parking_location;
pub mod ride;
pub mod user;
