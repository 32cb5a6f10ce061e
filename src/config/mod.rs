//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → semantic checks (ports, paths)
//!     → GatewayConfig (validated, immutable)
//!     → handed to the registry and both listeners at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; schema files reload, config does not
//! - All fields have defaults to allow minimal configs

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
