//! Payload conversion between handler plaintext and wire format.

use crate::codec::{CodecError, EncryptionCodec};
use maasagent_proto::Payload;

/// Metadata key describing the payload body encoding.
pub const ENCODING_KEY: &str = "encoding";

/// Encoding value marking an encrypted body.
pub const ENCRYPTED_ENCODING: &str = "binary/encrypted";

/// Applies the encryption codec to wire payloads.
///
/// Outbound payloads are encrypted and tagged with the encoding marker.
/// Inbound payloads are decrypted only when the marker is present, so
/// unencrypted control payloads pass through unchanged.
pub struct PayloadConverter {
    codec: EncryptionCodec,
}

impl PayloadConverter {
    /// Create a converter around an encryption codec.
    pub fn new(codec: EncryptionCodec) -> Self {
        Self { codec }
    }

    /// Encrypt a payload for transmission.
    pub fn to_wire(&self, mut payload: Payload) -> Result<Payload, CodecError> {
        payload.data = self.codec.encode(&payload.data)?;
        payload
            .metadata
            .insert(ENCODING_KEY.to_string(), ENCRYPTED_ENCODING.to_string());
        Ok(payload)
    }

    /// Decrypt a received payload.
    pub fn from_wire(&self, mut payload: Payload) -> Result<Payload, CodecError> {
        let encrypted = payload
            .metadata
            .get(ENCODING_KEY)
            .is_some_and(|encoding| encoding == ENCRYPTED_ENCODING);

        if encrypted {
            payload.data = self.codec.decode(&payload.data)?;
            payload.metadata.remove(ENCODING_KEY);
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn converter(secret: &[u8]) -> PayloadConverter {
        PayloadConverter::new(EncryptionCodec::new(secret).unwrap())
    }

    fn payload(data: &[u8]) -> Payload {
        Payload {
            metadata: HashMap::new(),
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_to_wire_tags_and_encrypts() {
        let converter = converter(b"secret");

        let wire = converter.to_wire(payload(b"task input")).unwrap();

        assert_eq!(
            wire.metadata.get(ENCODING_KEY).map(String::as_str),
            Some(ENCRYPTED_ENCODING)
        );
        assert_ne!(wire.data, b"task input");
    }

    #[test]
    fn test_wire_roundtrip() {
        let converter = converter(b"secret");

        let wire = converter.to_wire(payload(b"task input")).unwrap();
        let back = converter.from_wire(wire).unwrap();

        assert_eq!(back.data, b"task input");
        assert!(!back.metadata.contains_key(ENCODING_KEY));
    }

    #[test]
    fn test_from_wire_passthrough_when_untagged() {
        let converter = converter(b"secret");

        let back = converter.from_wire(payload(b"plain body")).unwrap();
        assert_eq!(back.data, b"plain body");
    }

    #[test]
    fn test_from_wire_wrong_secret_fails() {
        let sender = converter(b"secret one");
        let receiver = converter(b"secret two");

        let wire = sender.to_wire(payload(b"task input")).unwrap();
        let err = receiver.from_wire(wire).unwrap_err();

        assert!(matches!(err, CodecError::Decrypt(_)));
    }
}
