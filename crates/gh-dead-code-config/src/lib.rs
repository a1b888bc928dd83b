//! Configuration and credentials for gh-dead-code
//!
//! This crate provides:
//! - `.env` loading, done once before anything reads the environment
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig) with environment overrides
//! - Credentials (token and commit author) resolved once at startup

pub mod app_config;
pub mod config_file;
pub mod credentials;
pub mod env_file;

pub use app_config::{AnalysisConfig, AppConfig};
pub use config_file::load_config_file;
pub use credentials::Credentials;
pub use env_file::{load_env_file, load_env_file_from};
