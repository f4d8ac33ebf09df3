//! AES-256-GCM payload encryption.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Size of the GCM nonce prefixed to each encrypted message.
const NONCE_SIZE: usize = 12;

/// Payload codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The shared secret was empty
    #[error("encryption codec requires a non-empty secret")]
    EmptySecret,

    /// Encryption failed
    #[error("payload encryption failed: {0}")]
    Encrypt(String),

    /// Decryption or authentication failed
    #[error("payload decryption failed: {0}")]
    Decrypt(String),
}

/// Symmetric codec for task payload bodies.
///
/// The key is SHA-256 of the shared secret. Each message is framed as a
/// random 96-bit nonce followed by the ciphertext, so no nonce state is
/// kept between messages.
pub struct EncryptionCodec {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionCodec").finish_non_exhaustive()
    }
}

impl EncryptionCodec {
    /// Create a codec from the shared secret.
    ///
    /// Fails if the secret is empty; a misconfigured agent must not fall
    /// back to sending plaintext.
    pub fn new(secret: &[u8]) -> Result<Self, CodecError> {
        if secret.is_empty() {
            return Err(CodecError::EmptySecret);
        }

        let key = Sha256::digest(secret);
        let cipher = Aes256Gcm::new(&key);

        Ok(Self { cipher })
    }

    /// Encrypt a plaintext body into nonce || ciphertext framing.
    pub fn encode(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| CodecError::Encrypt(e.to_string()))?;

        let mut framed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        framed.extend_from_slice(&nonce);
        framed.extend_from_slice(&ciphertext);
        Ok(framed)
    }

    /// Decrypt a nonce || ciphertext frame back into the plaintext body.
    ///
    /// Fails if the frame is too short to hold a nonce or if GCM
    /// authentication rejects the ciphertext.
    pub fn decode(&self, framed: &[u8]) -> Result<Vec<u8>, CodecError> {
        if framed.len() < NONCE_SIZE {
            return Err(CodecError::Decrypt(
                "message shorter than nonce".to_string(),
            ));
        }

        let (nonce, ciphertext) = framed.split_at(NONCE_SIZE);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| CodecError::Decrypt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_fails_setup() {
        let err = EncryptionCodec::new(b"").unwrap_err();
        assert!(matches!(err, CodecError::EmptySecret));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = EncryptionCodec::new(b"0123456789abcdef").unwrap();

        let plaintext = b"power_on node abc123";
        let framed = codec.encode(plaintext).unwrap();
        let decoded = codec.decode(&framed).unwrap();

        assert_eq!(decoded, plaintext);
    }

    #[test]
    fn test_ciphertext_differs_from_plaintext() {
        let codec = EncryptionCodec::new(b"0123456789abcdef").unwrap();

        let plaintext = b"sensitive parameters";
        let framed = codec.encode(plaintext).unwrap();

        assert!(framed.len() > plaintext.len());
        assert!(!framed.windows(plaintext.len()).any(|w| w == plaintext));
    }

    #[test]
    fn test_distinct_nonces_per_message() {
        let codec = EncryptionCodec::new(b"0123456789abcdef").unwrap();

        let first = codec.encode(b"same input").unwrap();
        let second = codec.encode(b"same input").unwrap();

        assert_ne!(first[..NONCE_SIZE], second[..NONCE_SIZE]);
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_secret_fails_decode() {
        let codec = EncryptionCodec::new(b"correct secret").unwrap();
        let other = EncryptionCodec::new(b"different secret").unwrap();

        let framed = codec.encode(b"payload body").unwrap();
        let err = other.decode(&framed).unwrap_err();

        assert!(matches!(err, CodecError::Decrypt(_)));
    }

    #[test]
    fn test_truncated_frame_fails_decode() {
        let codec = EncryptionCodec::new(b"secret").unwrap();

        let err = codec.decode(&[0u8; 5]).unwrap_err();
        assert!(matches!(err, CodecError::Decrypt(_)));
    }

    #[test]
    fn test_tampered_ciphertext_fails_decode() {
        let codec = EncryptionCodec::new(b"secret").unwrap();

        let mut framed = codec.encode(b"payload body").unwrap();
        let last = framed.len() - 1;
        framed[last] ^= 0xff;

        let err = codec.decode(&framed).unwrap_err();
        assert!(matches!(err, CodecError::Decrypt(_)));
    }
}
