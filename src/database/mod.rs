pub mod connection;
pub mod leagues;
pub mod models;
pub mod results;
pub mod setup;
pub mod standings;
pub mod store;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use models::*;
pub use store::SqliteStore;
