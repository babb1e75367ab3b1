pub mod config;
pub mod languages;
pub mod recorder;
pub mod redis;
pub mod status;
pub mod types;
