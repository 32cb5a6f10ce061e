//! Error taxonomy shared across the codec and schema subsystems.
//!
//! # Responsibilities
//! - Spec errors: malformed or unknown codec descriptors
//! - Transform errors: a codec failed to encode/decode a payload
//! - Schema errors: load failures and descriptor lookups
//!
//! Nothing here is fatal to the process. The proxy maps these to 400
//! responses; the manager reports them back to the caller; the background
//! reload logs and keeps the previous good state.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while parsing a codec descriptor or running a chain.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The descriptor string was empty.
    #[error("empty codec descriptor")]
    EmptySpec,

    /// A descriptor entry had no `name:params` separator.
    #[error("malformed codec entry: {0:?}")]
    MalformedEntry(String),

    /// The named codec does not exist.
    #[error("codec not found: {0}")]
    UnknownCodec(String),

    /// The JSON params for a codec entry did not deserialize.
    #[error("invalid params for codec {name}: {source}")]
    InvalidParams {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A codec failed to transform a payload.
    #[error("{codec}: {reason}")]
    Transform { codec: &'static str, reason: String },

    /// The structured-message codec could not resolve a descriptor.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl CodecError {
    /// Shorthand for a transform failure attributed to one codec.
    pub fn transform(codec: &'static str, reason: impl ToString) -> Self {
        CodecError::Transform {
            codec,
            reason: reason.to_string(),
        }
    }
}

/// Errors produced by the schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The recursive walk found no `.proto` files at all.
    #[error("no proto files found under {}", .0.display())]
    NoSchemaFiles(PathBuf),

    /// Lookup by fully-qualified message name failed.
    #[error("message descriptor not found: {0}")]
    MessageNotFound(String),

    /// Lookup by fully-qualified enum name failed.
    #[error("enum descriptor not found: {0}")]
    EnumNotFound(String),

    /// The proto set failed to compile as one unit.
    #[error("proto compilation failed: {0}")]
    Compile(#[from] protox::Error),

    /// The compiled descriptor set was rejected by the reflection pool.
    #[error("descriptor pool rejected schema set: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    /// A schema file name contained path separators or was empty.
    #[error("invalid schema file name: {0:?}")]
    InvalidFileName(String),

    /// A named schema file does not exist on disk.
    #[error("schema file not found: {0}")]
    FileNotFound(String),

    /// Plain filesystem failure during walk or file management.
    #[error("schema io error: {0}")]
    Io(#[from] std::io::Error),
}
