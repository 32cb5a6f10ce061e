//! Gzip compression codec.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Deserialize;

use crate::error::CodecError;

/// Gzip codec; carries no configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GzipCodec {}

impl GzipCodec {
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(data)
            .and_then(|_| encoder.finish())
            .map_err(|e| CodecError::transform("gzip", e))
    }

    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        GzDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| CodecError::transform("gzip", e))?;
        Ok(out)
    }
}
