//! Configuration loading and management
//!
//! This module provides utilities for loading the agent configuration
//! from environment variables, `.env` files, and config files.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load, load_dotenv, load_from_env, load_from_file, probe_config_paths, EnvConfigProvider,
};
