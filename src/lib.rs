pub mod db;

pub mod config;
pub mod errors;
pub mod fx;
pub mod moderation;
pub mod providers;
pub mod schema;

pub use errors::{Error, Result};
