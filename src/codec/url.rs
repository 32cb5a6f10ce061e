//! Percent-escaping codec with query-string conventions.
//!
//! Unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through, space maps
//! to `+`, everything else is percent-encoded.

use percent_encoding::{percent_decode, percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::error::CodecError;

const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-escape codec; carries no configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlCodec {}

impl UrlCodec {
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let escaped = percent_encode(data, QUERY_ESCAPE).to_string();
        Ok(escaped.replace("%20", "+").into_bytes())
    }

    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut unplused = data.to_vec();
        for b in &mut unplused {
            if *b == b'+' {
                *b = b' ';
            }
        }
        // percent_decode passes malformed escapes through untouched, so
        // validate them up front to honor the fail-on-malformed contract.
        let mut rest = &unplused[..];
        while let Some(pos) = rest.iter().position(|&b| b == b'%') {
            if rest.len() < pos + 3
                || !rest[pos + 1].is_ascii_hexdigit()
                || !rest[pos + 2].is_ascii_hexdigit()
            {
                return Err(CodecError::transform("url", "invalid percent escape"));
            }
            rest = &rest[pos + 3..];
        }
        Ok(percent_decode(&unplused).collect())
    }
}
