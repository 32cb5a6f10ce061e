//! Ordered, invertible composition of codecs.

use crate::codec::Codec;
use crate::error::CodecError;

/// An ordered sequence of codecs. Order is semantically meaningful:
/// `encode_all` applies codecs first-to-last; `decode_all` also runs
/// first-to-last and expects a chain already ordered for decoding,
/// typically one produced by [`CodecChain::inverted`].
#[derive(Debug, Clone, Default)]
pub struct CodecChain {
    codecs: Vec<Codec>,
}

impl CodecChain {
    pub fn new(codecs: Vec<Codec>) -> Self {
        Self { codecs }
    }

    /// A new chain with element order reversed. Individual codecs are not
    /// mutated; for a chain of invertible codecs,
    /// `chain.inverted().decode_all(chain.encode_all(x)) == x`.
    pub fn inverted(&self) -> Self {
        let mut codecs = self.codecs.clone();
        codecs.reverse();
        Self { codecs }
    }

    /// Fold `encode` over the chain, short-circuiting on the first error.
    pub fn encode_all(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut buf = data.to_vec();
        for codec in &self.codecs {
            buf = codec.encode(&buf)?;
        }
        Ok(buf)
    }

    /// Fold `decode` over the chain, short-circuiting on the first error.
    pub fn decode_all(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut buf = data.to_vec();
        for codec in &self.codecs {
            buf = codec.decode(&buf)?;
        }
        Ok(buf)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Codec names in chain order, for logging.
    pub fn names(&self) -> Vec<&'static str> {
        self.codecs.iter().map(Codec::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::base64::Base64Codec;
    use crate::codec::gzip::GzipCodec;
    use crate::codec::rc4::Rc4Codec;

    fn chain() -> CodecChain {
        CodecChain::new(vec![
            Codec::Base64(Base64Codec::default()),
            Codec::Gzip(GzipCodec::default()),
        ])
    }

    #[test]
    fn test_encode_order_is_first_to_last() {
        let encoded = chain().encode_all(b"hello").unwrap();
        // base64 ran first, gzip second: ungzip yields the base64 text
        let unzipped = GzipCodec::default().decode(&encoded).unwrap();
        assert_eq!(unzipped, b"aGVsbG8=");
    }

    #[test]
    fn test_inverted_decode_roundtrip() {
        let c = CodecChain::new(vec![
            Codec::Rc4(Rc4Codec {
                key: "k3y".to_string(),
            }),
            Codec::Gzip(GzipCodec::default()),
            Codec::Base64(Base64Codec::default()),
        ]);
        let payload = b"some payload with \x00 binary \xff bytes";
        let encoded = c.encode_all(payload).unwrap();
        assert_eq!(c.inverted().decode_all(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_inverted_reverses_order_only() {
        let c = chain();
        assert_eq!(c.names(), ["base64", "gzip"]);
        assert_eq!(c.inverted().names(), ["gzip", "base64"]);
        // the original is untouched
        assert_eq!(c.names(), ["base64", "gzip"]);
    }

    #[test]
    fn test_error_short_circuits() {
        // gzip decode on non-gzip data fails before base64 ever runs
        let c = CodecChain::new(vec![
            Codec::Gzip(GzipCodec::default()),
            Codec::Base64(Base64Codec::default()),
        ]);
        assert!(c.decode_all(b"not gzip").is_err());
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let c = CodecChain::default();
        assert_eq!(c.encode_all(b"x").unwrap(), b"x");
        assert_eq!(c.decode_all(b"x").unwrap(), b"x");
    }
}
