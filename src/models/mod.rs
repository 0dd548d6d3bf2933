pub mod config;
pub mod database;

pub use config::*;
pub use database::*;
