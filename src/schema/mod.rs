//! Runtime protobuf schema subsystem.
//!
//! # Data Flow
//! ```text
//! .proto files on disk
//!     → walk.rs (bounded recursive discovery)
//!     → dynamic.rs (protox compile → descriptor pool)
//!     → registry.rs (atomic generation swap, lookups, file management)
//!     → structured-message codec + manager introspection
//! ```
//!
//! # Design Decisions
//! - No compiled stubs anywhere; messages are built purely from descriptors
//! - A load compiles each file against the import root (imports resolve,
//!   duplicate type names resolve to the last file in traversal order);
//!   any failure keeps the previous generation visible
//! - Parsing happens outside the registry lock; the write lock is held only
//!   for the final swap

pub mod dynamic;
pub mod registry;
pub mod walk;

pub use registry::SchemaRegistry;
