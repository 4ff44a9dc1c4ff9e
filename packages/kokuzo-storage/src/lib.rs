pub mod chunks;
pub mod db;
pub mod models;
pub mod pages;
pub mod schema;
pub mod seeds;
pub mod store;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
