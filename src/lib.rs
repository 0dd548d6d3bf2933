// lib.rs - 暴露数据层和服务层给 CLI 使用

pub mod core;
pub mod data;
pub mod models;
pub mod services;
pub mod utils;

pub use models::*;

pub use crate::core::{build_http_client, init_logger, AppError, AppResult};
pub use data::{DataError, EnvManager, FileSystem, StdFileSystem};
pub use services::{
    parse_connection_string, DatabaseProvisioner, DefaultStyle, InstagresClient, SaveOptions,
};
