//! Base64 codec for JPEG data URLs.
//!
//! The encoder writes a standard `data:image/jpeg;base64,` URL with conformant
//! padding, so its output can be handed to browsers and any other JPEG
//! consumer.
//!
//! The decoder is NOT a general base64 decoder. It skips exactly
//! [`DATA_URL_PREFIX_LEN`] characters without looking at them and assumes the
//! rest is a payload produced by [`encode_data_url`]. Feeding it a data URL
//! with a different MIME prefix silently misaligns every byte.

use crate::error::GlitchError;

/// Prefix written in front of every encoded payload.
pub const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Number of characters the decoder skips before the payload (23).
pub const DATA_URL_PREFIX_LEN: usize = DATA_URL_PREFIX.len();

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const PAD: u8 = b'=';

const INVALID: u8 = 0xFF;

const REVERSE_ALPHABET: [u8; 256] = build_reverse_alphabet();

const fn build_reverse_alphabet() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Length of the base64 payload (prefix excluded) for `n` input bytes.
#[inline]
pub fn encoded_payload_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

/// Encode bytes as a `data:image/jpeg;base64,` URL.
pub fn encode_data_url(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(DATA_URL_PREFIX_LEN + encoded_payload_len(bytes.len()));
    out.push_str(DATA_URL_PREFIX);

    let mut chunks = bytes.chunks_exact(3);
    for chunk in &mut chunks {
        let (b0, b1, b2) = (chunk[0], chunk[1], chunk[2]);
        out.push(sextet(b0 >> 2));
        out.push(sextet((b0 & 0x03) << 4 | b1 >> 4));
        out.push(sextet((b1 & 0x0f) << 2 | b2 >> 6));
        out.push(sextet(b2 & 0x3f));
    }

    match *chunks.remainder() {
        [b0] => {
            out.push(sextet(b0 >> 2));
            out.push(sextet((b0 & 0x03) << 4));
            out.push_str("==");
        }
        [b0, b1] => {
            out.push(sextet(b0 >> 2));
            out.push(sextet((b0 & 0x03) << 4 | b1 >> 4));
            out.push(sextet((b1 & 0x0f) << 2));
            out.push('=');
        }
        _ => {}
    }

    out
}

/// Decode a data URL produced by [`encode_data_url`].
///
/// The first [`DATA_URL_PREFIX_LEN`] characters are skipped unchecked. Each
/// 4-character group yields up to 3 bytes: the 2nd character combined with
/// the 1st gives byte 1, the 3rd with the low bits of the 2nd gives byte 2,
/// the 4th with the low bits of the 3rd gives byte 3. The first `=` ends the
/// payload.
///
/// # Errors
///
/// Returns [`GlitchError::MalformedDataUrl`] if the input is shorter than the
/// prefix or the payload contains a character outside the base64 alphabet.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, GlitchError> {
    let payload = data_url
        .as_bytes()
        .get(DATA_URL_PREFIX_LEN..)
        .ok_or_else(|| {
            GlitchError::MalformedDataUrl(format!(
                "expected at least {} characters, got {}",
                DATA_URL_PREFIX_LEN,
                data_url.len()
            ))
        })?;

    let mut out = Vec::with_capacity(payload.len() / 4 * 3);
    let mut prev = 0u8;

    for (i, &c) in payload.iter().enumerate() {
        if c == PAD {
            break;
        }

        let current = REVERSE_ALPHABET[c as usize];
        if current == INVALID {
            return Err(GlitchError::MalformedDataUrl(format!(
                "invalid base64 character {:?} at offset {}",
                c as char,
                DATA_URL_PREFIX_LEN + i
            )));
        }

        match i % 4 {
            // first digit of a group carries no complete byte yet
            0 => {}
            1 => out.push(prev << 2 | current >> 4),
            2 => out.push((prev & 0x0f) << 4 | current >> 2),
            _ => out.push((prev & 0x03) << 6 | current),
        }

        prev = current;
    }

    Ok(out)
}

#[inline]
fn sextet(value: u8) -> char {
    ALPHABET[usize::from(value & 0x3f)] as char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(data_url: &str) -> &str {
        &data_url[DATA_URL_PREFIX_LEN..]
    }

    #[test]
    fn test_prefix_len_matches_literal() {
        assert_eq!(DATA_URL_PREFIX_LEN, 23);
    }

    #[test]
    fn test_encode_known_vectors() {
        assert_eq!(payload(&encode_data_url(b"")), "");
        assert_eq!(payload(&encode_data_url(b"f")), "Zg==");
        assert_eq!(payload(&encode_data_url(b"fo")), "Zm8=");
        assert_eq!(payload(&encode_data_url(b"foo")), "Zm9v");
        assert_eq!(payload(&encode_data_url(b"foob")), "Zm9vYg==");
        assert_eq!(payload(&encode_data_url(b"fooba")), "Zm9vYmE=");
        assert_eq!(payload(&encode_data_url(b"foobar")), "Zm9vYmFy");
    }

    #[test]
    fn test_encode_uses_full_alphabet() {
        assert_eq!(payload(&encode_data_url(&[0xFB, 0xFF, 0xBF])), "+/+/");
        assert_eq!(payload(&encode_data_url(&[0xFF, 0xD8])), "/9g=");
    }

    #[test]
    fn test_encode_starts_with_prefix() {
        let url = encode_data_url(&[0xFF, 0xD8, 0xFF]);
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_decode_known_vectors() {
        let decode = |p: &str| decode_data_url(&format!("{DATA_URL_PREFIX}{p}")).unwrap();
        assert_eq!(decode(""), b"");
        assert_eq!(decode("Zg=="), b"f");
        assert_eq!(decode("Zm8="), b"fo");
        assert_eq!(decode("Zm9v"), b"foo");
        assert_eq!(decode("Zm9vYg=="), b"foob");
        assert_eq!(decode("Zm9vYmE="), b"fooba");
        assert_eq!(decode("Zm9vYmFy"), b"foobar");
    }

    #[test]
    fn test_decode_does_not_check_prefix() {
        // Any 23 characters are skipped, whatever they say.
        let url = "data:image/png;base64,xZm9v";
        assert_eq!(url.len() - 4, DATA_URL_PREFIX_LEN);
        assert_eq!(decode_data_url(url).unwrap(), b"foo");
    }

    #[test]
    fn test_decode_too_short() {
        let result = decode_data_url("data:image/jpeg");
        assert!(matches!(result, Err(GlitchError::MalformedDataUrl(_))));
    }

    #[test]
    fn test_decode_invalid_character() {
        let result = decode_data_url(&format!("{DATA_URL_PREFIX}Zm9*"));
        match result {
            Err(GlitchError::MalformedDataUrl(msg)) => assert!(msg.contains("offset 26"), "{msg}"),
            other => panic!("Expected MalformedDataUrl, got {:?}", other),
        }
    }

    #[test]
    fn test_encoded_payload_len() {
        assert_eq!(encoded_payload_len(0), 0);
        assert_eq!(encoded_payload_len(1), 4);
        assert_eq!(encoded_payload_len(3), 4);
        assert_eq!(encoded_payload_len(4), 8);
        assert_eq!(encoded_payload_len(417), 556);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: decoding the encoder's output gives back the input bytes.
        #[test]
        fn prop_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..2048)) {
            let url = encode_data_url(&bytes);
            prop_assert_eq!(decode_data_url(&url).unwrap(), bytes);
        }

        /// Property: payload length is ceil(n / 3) * 4 and always a multiple of 4.
        #[test]
        fn prop_payload_len(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            let url = encode_data_url(&bytes);
            let payload_len = url.len() - DATA_URL_PREFIX_LEN;
            prop_assert_eq!(payload_len, encoded_payload_len(bytes.len()));
            prop_assert_eq!(payload_len % 4, 0);
        }
    }
}
