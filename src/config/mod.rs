//! Configuration module for modelarium
//!
//! Loads config from `$XDG_CONFIG_HOME/modelarium/config.toml` or `~/.config/modelarium/config.toml`.
//! Falls back to embedded defaults if file doesn't exist.
//! Partial configs are merged with defaults using serde's default attributes.
//! Command line flags override whatever is loaded here.
//!
//! # Example
//!
//! ```no_run
//! use modelarium::config::Config;
//!
//! let config = Config::load().expect("Failed to load config");
//! println!("Output dir: {}", config.fetch.output_dir.display());
//! println!("Ollama host: {}", config.instances.host);
//! ```

pub mod schema;

pub use schema::{Config, FetchConfig, InstancesConfig};
