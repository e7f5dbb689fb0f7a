pub mod channels;
pub mod connection;
pub mod inventory;
pub mod snapshots;

pub use connection::{init_db, Database};
