//! # Hashing
//!
//! Keccak-256, the pre-standard variant of SHA-3 with the original padding.
//! Not interchangeable with NIST SHA3-256: same sponge, different output.

use tiny_keccak::{Hasher, Keccak};

use crate::config::MESSAGE_PREFIX;

/// Keccak-256 of the empty input.
///
/// The signing pipeline treats a digest equal to this as "nothing to sign"
/// rather than a real hash.
pub const EMPTY_KECCAK256: [u8; 32] = [
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
];

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Keccak-256 with the empty-input sentinel mapped to `None`.
pub fn sha3(data: &[u8]) -> Option<[u8; 32]> {
    let digest = keccak256(data);
    if digest == EMPTY_KECCAK256 {
        None
    } else {
        Some(digest)
    }
}

/// Digest for personal-message signing:
/// `keccak256("\x19Ethereum Signed Message:\n" ∥ len(message) ∥ message)`,
/// with the length written in decimal ASCII.
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_sentinel() {
        assert_eq!(keccak256(b""), EMPTY_KECCAK256);
        assert_eq!(sha3(b""), None);
    }

    #[test]
    fn known_vector() {
        // keccak256("abc")
        assert_eq!(
            hex::encode(keccak256(b"abc")),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
        assert_eq!(sha3(b"abc"), Some(keccak256(b"abc")));
    }

    #[test]
    fn message_hash_includes_prefix_and_length() {
        let mut manual = Vec::new();
        manual.extend_from_slice(b"\x19Ethereum Signed Message:\n5hello");
        assert_eq!(hash_message(b"hello"), keccak256(&manual));
        assert_ne!(hash_message(b"hello"), keccak256(b"hello"));
    }
}
