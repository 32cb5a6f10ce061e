//! Base64 codec, standard alphabet with padding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::CodecError;

/// Base64 codec; carries no configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Base64Codec {}

impl Base64Codec {
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(STANDARD.encode(data).into_bytes())
    }

    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        STANDARD
            .decode(data)
            .map_err(|e| CodecError::transform("base64", e))
    }
}
