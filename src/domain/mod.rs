pub mod mapping;
pub mod models;
pub mod progress;
