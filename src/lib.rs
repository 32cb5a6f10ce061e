//! wiregate — a transcoding HTTP gateway.
//!
//! Rewrites request and response bodies in flight, converting between a
//! human-editable JSON representation and a chain of wire encodings:
//! runtime-compiled protobuf, RC4, AES-CBC, gzip, base64 and percent
//! escaping, selected per request by a header-encoded descriptor string.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ proxy listener ──▶ codec chain (encode) ──▶ upstream
//!                  │                    │
//!                  │              schema registry (protobuf descriptors,
//!                  │              hot-reloadable, shared RwLock)
//!                  │                    │
//!   Client ◀── response rewrite ◀── codec chain (decode) ◀── upstream
//!
//!   Operator ──▶ manager listener (type listing, reload, file upload)
//! ```

// Core subsystems
pub mod codec;
pub mod config;
pub mod proxy;
pub mod schema;

// Management surface
pub mod manager;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;

pub use config::GatewayConfig;
pub use error::{CodecError, SchemaError};
pub use lifecycle::Shutdown;
pub use manager::ManagerServer;
pub use proxy::{ProxyServer, ProxyState};
pub use schema::SchemaRegistry;
