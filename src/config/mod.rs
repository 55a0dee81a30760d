//! 配置管理
//!
//! 配置按以下顺序叠加：`config.toml` -> `config.{APP_ENV}.toml` -> 环境变量。

#[path = "impl.rs"]
mod config_impl;
mod structs;

pub use structs::*;
