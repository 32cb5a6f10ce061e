//! Transcoding reverse-proxy subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → req-codec / res-codec headers → codec::spec (chain construction)
//!     → request body → encode_all → forward upstream (method/path/headers
//!       preserved, content-length fixed up)
//!     → upstream response body → decode_all → return as application/json
//! ```
//!
//! # Design Decisions
//! - A request that fails to transform is never partially forwarded
//! - An upstream response that fails to decode is discarded, not relayed
//! - Length headers come from the actual rewritten buffers, never estimated

pub mod server;

pub use server::{ProxyServer, ProxyState, REQ_CODEC_HEADER, RES_CODEC_HEADER};
