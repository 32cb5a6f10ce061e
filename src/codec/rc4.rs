//! RC4 stream-cipher codec.
//!
//! Self-inverse: encoding and decoding are the same XOR-keystream pass, so
//! both dispatch to [`Rc4Codec::apply`]. The keystream is generated inline
//! because the RustCrypto `rc4` crate fixes the key length in the type
//! system, while descriptor-supplied keys are arbitrary-length strings.

use serde::Deserialize;

use crate::error::CodecError;

/// RC4 codec configuration, deserialized from the descriptor entry params.
#[derive(Debug, Clone, Deserialize)]
pub struct Rc4Codec {
    /// Symmetric key; RC4 accepts 1..=256 bytes.
    #[serde(default)]
    pub key: String,
}

impl Rc4Codec {
    /// XOR `data` with the RC4 keystream derived from the configured key.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let key = self.key.as_bytes();
        if key.is_empty() || key.len() > 256 {
            return Err(CodecError::transform(
                "rc4",
                format!("invalid key length {}", key.len()),
            ));
        }

        // Key-scheduling
        let mut s: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
            s.swap(i, j as usize);
        }

        // Keystream generation
        let (mut i, mut j) = (0u8, 0u8);
        let mut out = Vec::with_capacity(data.len());
        for &b in data {
            i = i.wrapping_add(1);
            j = j.wrapping_add(s[i as usize]);
            s.swap(i as usize, j as usize);
            let k = s[s[i as usize].wrapping_add(s[j as usize]) as usize];
            out.push(b ^ k);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(key: &str) -> Rc4Codec {
        Rc4Codec {
            key: key.to_string(),
        }
    }

    #[test]
    fn test_known_vectors() {
        // Wikipedia RC4 test vectors
        let out = codec("Key").apply(b"Plaintext").unwrap();
        assert_eq!(
            out,
            [0xBB, 0xF3, 0x16, 0xE8, 0xD9, 0x40, 0xAF, 0x0A, 0xD3]
        );

        let out = codec("Secret").apply(b"Attack at dawn").unwrap();
        assert_eq!(
            out,
            [
                0x45, 0xA0, 0x1F, 0x64, 0x5F, 0xC3, 0x5B, 0x38, 0x35, 0x52, 0x54, 0x4B, 0x9B,
                0xF5
            ]
        );
    }

    #[test]
    fn test_self_inverse() {
        let c = codec("some key");
        for payload in [&b""[..], b"x", b"hello world", &[0u8, 1, 2, 255, 254]] {
            let enc = c.apply(payload).unwrap();
            assert_eq!(c.apply(&enc).unwrap(), payload);
        }
    }

    #[test]
    fn test_empty_key_fails() {
        assert!(codec("").apply(b"data").is_err());
    }
}
