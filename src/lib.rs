pub mod config;
pub mod error;
pub mod instances;
pub mod models;

pub use error::{ModelariumError, RemoteError, Result};
