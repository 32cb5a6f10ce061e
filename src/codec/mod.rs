//! Reversible byte-transformation codecs.
//!
//! # Data Flow
//! ```text
//! descriptor string ("pb:{...};rc4:{...};base64:{}")
//!     → spec.rs (parse entries, build codecs)
//!     → chain.rs (ordered composition, inversion)
//!     → encode_all on request bodies / decode_all on response bodies
//! ```
//!
//! # Design Decisions
//! - `Codec` is a closed enum, one variant per codec kind; construction is
//!   a match over the entry name rather than an open registry
//! - Each variant carries only its own configuration, deserialized from the
//!   per-entry JSON params; nothing is persisted between requests
//! - `encode` moves a payload toward its wire encoding, `decode` reverses it

pub mod aes;
pub mod base64;
pub mod chain;
pub mod gzip;
pub mod proto;
pub mod rc4;
pub mod spec;
pub mod url;

pub use chain::CodecChain;
pub use spec::parse_chain;

use crate::error::CodecError;

/// A single named, configurable byte transformation.
#[derive(Debug, Clone)]
pub enum Codec {
    Proto(proto::ProtoCodec),
    Rc4(rc4::Rc4Codec),
    Aes(aes::AesCodec),
    Gzip(gzip::GzipCodec),
    Base64(base64::Base64Codec),
    Url(url::UrlCodec),
}

impl Codec {
    /// The descriptor-entry name of this codec.
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Proto(_) => "pb",
            Codec::Rc4(_) => "rc4",
            Codec::Aes(_) => "aes",
            Codec::Gzip(_) => "gzip",
            Codec::Base64(_) => "base64",
            Codec::Url(_) => "url",
        }
    }

    /// Transform a payload toward its wire encoding.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            Codec::Proto(c) => c.encode(data),
            Codec::Rc4(c) => c.apply(data),
            Codec::Aes(c) => c.encode(data),
            Codec::Gzip(c) => c.encode(data),
            Codec::Base64(c) => c.encode(data),
            Codec::Url(c) => c.encode(data),
        }
    }

    /// Reverse [`Codec::encode`].
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            Codec::Proto(c) => c.decode(data),
            Codec::Rc4(c) => c.apply(data),
            Codec::Aes(c) => c.decode(data),
            Codec::Gzip(c) => c.decode(data),
            Codec::Base64(c) => c.decode(data),
            Codec::Url(c) => c.decode(data),
        }
    }
}
