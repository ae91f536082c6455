pub mod manager;
pub mod models;

pub use manager::{DatabaseManager, DatabaseError};
pub use models::Item;
