pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod reader;
pub mod server;
pub mod storage;

pub type VintageResult<T> = anyhow::Result<T>;
