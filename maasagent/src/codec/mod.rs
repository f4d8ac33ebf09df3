//! Payload encryption codec.
//!
//! Task payloads cross the wire encrypted with AES-256-GCM under a key
//! derived from the agent's shared secret. [`EncryptionCodec`] does the
//! raw byte work; [`PayloadConverter`] applies it to wire payloads and
//! tags them so the receiving side knows what to undo.

mod converter;
mod encryption;

pub use converter::{PayloadConverter, ENCODING_KEY, ENCRYPTED_ENCODING};
pub use encryption::{CodecError, EncryptionCodec};
