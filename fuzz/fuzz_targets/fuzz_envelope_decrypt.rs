//! Fuzz target for envelope decryption
//!
//! This target focuses on finding vulnerabilities in envelope parsing and
//! AEAD decryption. It tests:
//! - Envelope parsing with arbitrary strings (malformed Base64, short inputs)
//! - Authentication failure handling (no plaintext leakage)
//! - Roundtrip with corruption (tampered envelopes must never decrypt)

#![no_main]

use arbitrary::Arbitrary;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use libfuzzer_sys::fuzz_target;
use lockstash_core::crypto::envelope::{decrypt, encrypt};
use lockstash_core::crypto::kdf::SALT_LEN;

/// Fixed credentials for fuzzing; key derivation itself is deterministic.
const PASSWORD: &str = "fuzz-master-password";
const SALT: [u8; SALT_LEN] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
    0x0f,
];

/// Structured input for more targeted fuzzing
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// Mode of operation
    mode: FuzzMode,
    /// Raw data to fuzz with
    data: Vec<u8>,
}

#[derive(Arbitrary, Debug)]
enum FuzzMode {
    /// Fuzz decryption with an arbitrary (possibly invalid) string
    EnvelopeRaw,
    /// Fuzz decryption with valid Base64 of arbitrary bytes
    EnvelopeBase64,
    /// Fuzz roundtrip (encrypt then corrupt then decrypt)
    RoundtripCorrupt,
}

fuzz_target!(|input: FuzzInput| {
    // Limit input size to avoid OOM
    if input.data.len() > 1024 * 1024 {
        return;
    }

    match input.mode {
        FuzzMode::EnvelopeRaw => {
            // Should never panic, always return Result
            if let Ok(envelope) = std::str::from_utf8(&input.data) {
                let _ = decrypt(envelope, PASSWORD, &SALT);
            }
        }

        FuzzMode::EnvelopeBase64 => {
            let envelope = BASE64.encode(&input.data);
            let _ = decrypt(&envelope, PASSWORD, &SALT);
        }

        FuzzMode::RoundtripCorrupt => {
            let Ok(plaintext) = std::str::from_utf8(&input.data) else {
                return;
            };

            let envelope = encrypt(plaintext, PASSWORD, &SALT).expect("encryption must succeed");

            // Verify clean roundtrip works
            let decrypted =
                decrypt(&envelope, PASSWORD, &SALT).expect("roundtrip of valid envelope must succeed");
            assert_eq!(plaintext, decrypted, "roundtrip must preserve plaintext");

            // Now corrupt the raw envelope bytes and verify decryption fails
            let mut raw = BASE64.decode(&envelope).expect("own envelope is valid base64");
            if !raw.is_empty() {
                let pos = input.data.iter().map(|&b| b as usize).sum::<usize>() % raw.len();
                raw[pos] ^= 0x01;

                // Corrupted data must fail decryption; it must never panic
                // or return plaintext.
                assert!(decrypt(&BASE64.encode(&raw), PASSWORD, &SALT).is_err());
            }
        }
    }
});
