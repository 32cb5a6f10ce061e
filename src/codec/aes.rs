//! AES-CBC block-cipher codec with PKCS#7 padding.
//!
//! Padding is always appended, so a block-aligned payload grows by one full
//! block. The AES variant is picked from the key length at run time
//! (16/24/32 bytes); anything else is rejected before touching the cipher.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use serde::Deserialize;

use crate::error::CodecError;

const BLOCK_SIZE: usize = 16;

/// AES codec configuration, deserialized from the descriptor entry params.
#[derive(Debug, Clone, Deserialize)]
pub struct AesCodec {
    /// Symmetric key; must be 16, 24 or 32 bytes.
    #[serde(default)]
    pub key: String,
    /// CBC initialization vector; must be one block (16 bytes).
    #[serde(default)]
    pub iv: String,
}

impl AesCodec {
    /// Pad with PKCS#7 and CBC-encrypt.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        if data.is_empty() {
            return Err(CodecError::transform("aes", "encrypt failed, src empty"));
        }
        let (key, iv) = (self.key.as_bytes(), self.iv.as_bytes());
        let encrypted = match key.len() {
            16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
                .map_err(|e| CodecError::transform("aes", e))?
                .encrypt_padded_vec_mut::<Pkcs7>(data),
            24 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
                .map_err(|e| CodecError::transform("aes", e))?
                .encrypt_padded_vec_mut::<Pkcs7>(data),
            32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
                .map_err(|e| CodecError::transform("aes", e))?
                .encrypt_padded_vec_mut::<Pkcs7>(data),
            n => {
                return Err(CodecError::transform(
                    "aes",
                    format!("invalid key length {n}"),
                ))
            }
        };
        Ok(encrypted)
    }

    /// CBC-decrypt and strip the PKCS#7 padding.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        if data.is_empty() {
            return Err(CodecError::transform("aes", "decrypt failed, src empty"));
        }
        if data.len() % BLOCK_SIZE != 0 {
            return Err(CodecError::transform(
                "aes",
                "ciphertext is not a multiple of the block size",
            ));
        }
        let (key, iv) = (self.key.as_bytes(), self.iv.as_bytes());
        let decrypted = match key.len() {
            16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
                .map_err(|e| CodecError::transform("aes", e))?
                .decrypt_padded_vec_mut::<Pkcs7>(data),
            24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
                .map_err(|e| CodecError::transform("aes", e))?
                .decrypt_padded_vec_mut::<Pkcs7>(data),
            32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
                .map_err(|e| CodecError::transform("aes", e))?
                .decrypt_padded_vec_mut::<Pkcs7>(data),
            n => {
                return Err(CodecError::transform(
                    "aes",
                    format!("invalid key length {n}"),
                ))
            }
        };
        decrypted.map_err(|_| CodecError::transform("aes", "invalid padding"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(key: &str) -> AesCodec {
        AesCodec {
            key: key.to_string(),
            iv: "0102030405060708".to_string(),
        }
    }

    #[test]
    fn test_roundtrip_all_key_sizes() {
        for key in [
            "0123456789abcdef",
            "0123456789abcdef01234567",
            "0123456789abcdef0123456789abcdef",
        ] {
            let c = codec(key);
            for payload in [&b"x"[..], b"hello world", &[0u8; 16], &[7u8; 33]] {
                let enc = c.encode(payload).unwrap();
                assert_eq!(c.decode(&enc).unwrap(), payload);
            }
        }
    }

    #[test]
    fn test_aligned_input_grows_full_block() {
        let c = codec("0123456789abcdef");
        let enc = c.encode(&[0u8; 32]).unwrap();
        assert_eq!(enc.len(), 48);
    }

    #[test]
    fn test_empty_input_fails() {
        let c = codec("0123456789abcdef");
        assert!(c.encode(b"").is_err());
        assert!(c.decode(b"").is_err());
    }

    #[test]
    fn test_bad_key_length_fails() {
        let c = codec("short");
        assert!(c.encode(b"data").is_err());
    }

    #[test]
    fn test_unaligned_ciphertext_fails() {
        let c = codec("0123456789abcdef");
        assert!(c.decode(&[1u8; 17]).is_err());
    }
}
