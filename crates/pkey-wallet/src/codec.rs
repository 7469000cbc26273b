//! Private key text formats and key file parsing.
//!
//! Two formats are accepted when reading a key file:
//!
//! 1. **Encoded**: the whole file is `PrivateKey-` followed by the CB58
//!    encoding of the 32 key bytes.
//! 2. **Raw hex**: exactly 64 ASCII hex characters, optionally followed by
//!    at most two `\n`/`\r` bytes.
//!
//! Each format has its own parser returning a [`ParseOutcome`].
//! [`load_from_bytes`] tries the encoded parser first and only falls back to
//! raw hex when the input is not in the encoded format at all. An input
//! that carries the prefix but fails to decode is reported as corrupt.

use pkey_core::cb58;
use pkey_core::crypto::{PRIVATE_KEY_LEN, PrivateKey};

use crate::error::KeyError;

/// Prefix of an encoded private key.
pub const PRIVATE_KEY_PREFIX: &str = "PrivateKey-";

/// Number of hex characters in a raw-hex key file.
pub const HEX_KEY_LEN: usize = PRIVATE_KEY_LEN * 2;

/// Maximum number of `\n`/`\r` bytes allowed after the hex characters.
pub const MAX_TRAILING_NEWLINES: usize = 2;

/// Bytes below this value end the hex scan.
const PRINTABLE_THRESHOLD: u8 = b'!';

/// Result of one parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The input holds a valid key in this format.
    Key(PrivateKey),
    /// The input is not in this format. Another parser may be tried.
    FormatMismatch,
    /// The input is in this format but damaged.
    Corrupt(KeyError),
}

/// Which file format a loaded key was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFileFormat {
    Encoded,
    Hex,
}

/// A key read from a file, with the format it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedKey {
    pub key: PrivateKey,
    pub format: KeyFileFormat,
}

/// Encode a private key as `PrivateKey-<cb58>`.
pub fn encode_private_key(key: &PrivateKey) -> String {
    format!("{PRIVATE_KEY_PREFIX}{}", cb58::encode(&key.to_bytes()))
}

/// Decode a `PrivateKey-<cb58>` string.
pub fn decode_private_key(encoded: &str) -> Result<PrivateKey, KeyError> {
    let payload = encoded
        .strip_prefix(PRIVATE_KEY_PREFIX)
        .ok_or_else(|| KeyError::InvalidEncoding(format!("missing {PRIVATE_KEY_PREFIX} prefix")))?;
    let bytes = cb58::decode_array::<PRIVATE_KEY_LEN>(payload)
        .map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;
    Ok(PrivateKey::from_bytes(&bytes)?)
}

/// Try to read `bytes` as an encoded key.
pub fn parse_encoded(bytes: &[u8]) -> ParseOutcome {
    if !bytes.starts_with(PRIVATE_KEY_PREFIX.as_bytes()) {
        return ParseOutcome::FormatMismatch;
    }
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => return ParseOutcome::Corrupt(KeyError::InvalidEncoding(e.to_string())),
    };
    match decode_private_key(text) {
        Ok(key) => ParseOutcome::Key(key),
        Err(e) => ParseOutcome::Corrupt(e),
    }
}

/// Try to read `bytes` as a raw-hex key file.
///
/// This is the fallback format, so it never returns
/// [`ParseOutcome::FormatMismatch`].
pub fn parse_hex_frame(bytes: &[u8]) -> ParseOutcome {
    match read_hex_frame(bytes) {
        Ok(key) => ParseOutcome::Key(key),
        Err(e) => ParseOutcome::Corrupt(e),
    }
}

fn read_hex_frame(bytes: &[u8]) -> Result<PrivateKey, KeyError> {
    let mut iter = bytes.iter().copied();

    let mut digits = [0u8; HEX_KEY_LEN];
    let mut n = 0;
    while n < HEX_KEY_LEN {
        match iter.next() {
            Some(b) if b >= PRINTABLE_THRESHOLD => {
                digits[n] = b;
                n += 1;
            }
            // End of input or a terminator byte (which is consumed)
            _ => break,
        }
    }
    if n != HEX_KEY_LEN {
        return Err(KeyError::InvalidPrivateKeyLen);
    }

    for (idx, b) in iter.enumerate() {
        if b != b'\n' && b != b'\r' {
            return Err(KeyError::InvalidPrivateKeyEnding);
        }
        if idx >= MAX_TRAILING_NEWLINES {
            return Err(KeyError::InvalidPrivateKeyLen);
        }
    }

    let mut raw = zeroize::Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
    let decoded = hex::decode_to_slice(digits, raw.as_mut_slice());
    zeroize::Zeroize::zeroize(&mut digits);
    decoded.map_err(|_| KeyError::InvalidPrivateKeyLen)?;
    Ok(PrivateKey::from_bytes(raw.as_slice())?)
}

/// Parse the contents of a key file in either supported format.
pub fn load_from_bytes(bytes: &[u8]) -> Result<LoadedKey, KeyError> {
    match parse_encoded(bytes) {
        ParseOutcome::Key(key) => {
            return Ok(LoadedKey {
                key,
                format: KeyFileFormat::Encoded,
            });
        }
        ParseOutcome::Corrupt(e) => return Err(e),
        ParseOutcome::FormatMismatch => {}
    }
    match parse_hex_frame(bytes) {
        ParseOutcome::Key(key) => Ok(LoadedKey {
            key,
            format: KeyFileFormat::Hex,
        }),
        ParseOutcome::Corrupt(e) => Err(e),
        ParseOutcome::FormatMismatch => Err(KeyError::InvalidPrivateKeyLen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkey_core::error::CryptoError;
    use proptest::prelude::*;

    const EWOQ_ENCODED: &str = "PrivateKey-ewoqjP7PxY4yr3iLTpLisriqt94hdyDFNgchSxGGztUrTXtNN";
    const EWOQ_HEX: &str = "56289e99c94b6912bfc12adc093c9b51124f0dc54ac7a766b2bc5ccf558d8027";

    fn ewoq() -> PrivateKey {
        PrivateKey::from_bytes(&hex::decode(EWOQ_HEX).unwrap()).unwrap()
    }

    fn hex_file(trailer: &[u8]) -> Vec<u8> {
        let mut bytes = EWOQ_HEX.as_bytes().to_vec();
        bytes.extend_from_slice(trailer);
        bytes
    }

    fn expect_corrupt(outcome: ParseOutcome) -> KeyError {
        match outcome {
            ParseOutcome::Corrupt(e) => e,
            other => panic!("expected corrupt, got {other:?}"),
        }
    }

    // --- Encoded format ---

    #[test]
    fn encode_known_key() {
        assert_eq!(encode_private_key(&ewoq()), EWOQ_ENCODED);
    }

    #[test]
    fn decode_known_key() {
        assert_eq!(decode_private_key(EWOQ_ENCODED).unwrap(), ewoq());
    }

    #[test]
    fn decode_requires_prefix() {
        let bare = EWOQ_ENCODED.trim_start_matches(PRIVATE_KEY_PREFIX);
        assert!(matches!(
            decode_private_key(bare),
            Err(KeyError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn decode_rejects_wrong_payload_length() {
        let short = format!("{PRIVATE_KEY_PREFIX}{}", cb58::encode(&[7u8; 31]));
        assert!(matches!(
            decode_private_key(&short),
            Err(KeyError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn decode_rejects_bad_base58() {
        assert!(matches!(
            decode_private_key("PrivateKey-0OIl"),
            Err(KeyError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn decode_rejects_zero_scalar() {
        let zero = format!("{PRIVATE_KEY_PREFIX}{}", cb58::encode(&[0u8; 32]));
        assert_eq!(
            decode_private_key(&zero).unwrap_err(),
            KeyError::Crypto(CryptoError::InvalidSecretKey)
        );
    }

    #[test]
    fn every_single_byte_flip_is_detected() {
        let body = &EWOQ_ENCODED[PRIVATE_KEY_PREFIX.len()..];
        // Key bytes followed by the checksum
        let payload = bs58::decode(body).into_vec().unwrap();
        assert_eq!(payload.len(), PRIVATE_KEY_LEN + cb58::CHECKSUM_LEN);
        for pos in 0..payload.len() {
            for mask in [0x01u8, 0x80, 0xFF] {
                let mut tampered = payload.clone();
                tampered[pos] ^= mask;
                let text = format!(
                    "{PRIVATE_KEY_PREFIX}{}",
                    bs58::encode(&tampered).into_string()
                );
                assert!(
                    matches!(decode_private_key(&text), Err(KeyError::InvalidEncoding(_))),
                    "flip at {pos} with mask {mask:#x} not detected"
                );
            }
        }
    }

    proptest! {
        #[test]
        fn encode_decode_roundtrip(seed in prop::array::uniform32(1u8..)) {
            let key = PrivateKey::from_bytes(&seed).unwrap();
            let encoded = encode_private_key(&key);
            prop_assert!(encoded.starts_with(PRIVATE_KEY_PREFIX));
            prop_assert_eq!(decode_private_key(&encoded).unwrap(), key);
        }
    }

    // --- Encoded parser outcomes ---

    #[test]
    fn parse_encoded_without_prefix_is_mismatch() {
        assert_eq!(parse_encoded(EWOQ_HEX.as_bytes()), ParseOutcome::FormatMismatch);
        assert_eq!(parse_encoded(b""), ParseOutcome::FormatMismatch);
    }

    #[test]
    fn parse_encoded_with_prefix_but_damaged_is_corrupt() {
        let mut bytes = EWOQ_ENCODED.as_bytes().to_vec();
        let last = bytes.len() - 1;
        bytes[last] = b'z';
        let e = expect_corrupt(parse_encoded(&bytes));
        assert!(matches!(e, KeyError::InvalidEncoding(_)));
    }

    #[test]
    fn parse_encoded_trailing_newline_is_corrupt() {
        let mut bytes = EWOQ_ENCODED.as_bytes().to_vec();
        bytes.push(b'\n');
        assert!(matches!(parse_encoded(&bytes), ParseOutcome::Corrupt(_)));
    }

    #[test]
    fn parse_encoded_non_utf8_is_corrupt() {
        let mut bytes = PRIVATE_KEY_PREFIX.as_bytes().to_vec();
        bytes.push(0xFF);
        assert!(matches!(
            parse_encoded(&bytes),
            ParseOutcome::Corrupt(KeyError::InvalidEncoding(_))
        ));
    }

    // --- Raw-hex framing ---

    #[test]
    fn hex_without_trailer_loads() {
        assert_eq!(parse_hex_frame(&hex_file(b"")), ParseOutcome::Key(ewoq()));
    }

    #[test]
    fn hex_with_one_or_two_newlines_loads() {
        for trailer in [&b"\n"[..], b"\r", b"\r\n", b"\n\n", b"\n\r", b"\r\r"] {
            assert_eq!(
                parse_hex_frame(&hex_file(trailer)),
                ParseOutcome::Key(ewoq()),
                "trailer {trailer:?}"
            );
        }
    }

    #[test]
    fn hex_with_three_newlines_is_len_error() {
        for trailer in [&b"\n\n\n"[..], b"\r\n\r", b"\r\r\r\r"] {
            assert_eq!(
                expect_corrupt(parse_hex_frame(&hex_file(trailer))),
                KeyError::InvalidPrivateKeyLen
            );
        }
    }

    #[test]
    fn hex_with_other_trailing_byte_is_ending_error() {
        for trailer in [&b" "[..], b"0", b"\t", b"\nx", b"\n\nx", b"\x00"] {
            assert_eq!(
                expect_corrupt(parse_hex_frame(&hex_file(trailer))),
                KeyError::InvalidPrivateKeyEnding,
                "trailer {trailer:?}"
            );
        }
    }

    #[test]
    fn hex_ending_checked_before_count() {
        // The third byte is not a newline, so Ending wins over Len
        assert_eq!(
            expect_corrupt(parse_hex_frame(&hex_file(b"\n\nA"))),
            KeyError::InvalidPrivateKeyEnding
        );
    }

    #[test]
    fn hex_short_is_len_error() {
        assert_eq!(
            expect_corrupt(parse_hex_frame(&EWOQ_HEX.as_bytes()[..63])),
            KeyError::InvalidPrivateKeyLen
        );
    }

    #[test]
    fn hex_terminated_early_is_len_error() {
        let mut bytes = EWOQ_HEX.as_bytes()[..40].to_vec();
        bytes.push(b'\n');
        bytes.extend_from_slice(&EWOQ_HEX.as_bytes()[40..]);
        assert_eq!(
            expect_corrupt(parse_hex_frame(&bytes)),
            KeyError::InvalidPrivateKeyLen
        );
    }

    #[test]
    fn hex_non_hex_printable_is_len_error() {
        let mut bytes = EWOQ_HEX.as_bytes().to_vec();
        bytes[10] = b'g';
        assert_eq!(
            expect_corrupt(parse_hex_frame(&bytes)),
            KeyError::InvalidPrivateKeyLen
        );
    }

    #[test]
    fn hex_empty_is_len_error() {
        assert_eq!(
            expect_corrupt(parse_hex_frame(b"")),
            KeyError::InvalidPrivateKeyLen
        );
    }

    #[test]
    fn hex_uppercase_accepted() {
        let upper = EWOQ_HEX.to_uppercase();
        assert_eq!(parse_hex_frame(upper.as_bytes()), ParseOutcome::Key(ewoq()));
    }

    #[test]
    fn hex_zero_key_is_crypto_error() {
        let zeros = "0".repeat(HEX_KEY_LEN);
        assert_eq!(
            expect_corrupt(parse_hex_frame(zeros.as_bytes())),
            KeyError::Crypto(CryptoError::InvalidSecretKey)
        );
    }

    proptest! {
        #[test]
        fn hex_any_single_bad_trailer_rejected(b in any::<u8>().prop_filter("not newline", |b| *b != b'\n' && *b != b'\r')) {
            let outcome = parse_hex_frame(&hex_file(&[b]));
            prop_assert_eq!(outcome, ParseOutcome::Corrupt(KeyError::InvalidPrivateKeyEnding));
        }
    }

    // --- Composed loader ---

    #[test]
    fn load_prefers_encoded() {
        let loaded = load_from_bytes(EWOQ_ENCODED.as_bytes()).unwrap();
        assert_eq!(loaded.format, KeyFileFormat::Encoded);
        assert_eq!(loaded.key, ewoq());
    }

    #[test]
    fn load_falls_back_to_hex() {
        let loaded = load_from_bytes(&hex_file(b"\n")).unwrap();
        assert_eq!(loaded.format, KeyFileFormat::Hex);
        assert_eq!(loaded.key, ewoq());
    }

    #[test]
    fn load_does_not_fall_through_on_corrupt_encoding() {
        let corrupt = format!("{PRIVATE_KEY_PREFIX}{EWOQ_HEX}");
        assert!(matches!(
            load_from_bytes(corrupt.as_bytes()),
            Err(KeyError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn load_empty_is_len_error() {
        assert_eq!(load_from_bytes(b"").unwrap_err(), KeyError::InvalidPrivateKeyLen);
    }
}
