//! JPEG scan-data corruption.
//!
//! Bytes are only overwritten after the Start-Of-Scan marker, so the file's
//! header segments (quantization and Huffman tables, frame header) stay
//! intact and decoders still accept the result while the pixel content
//! breaks up.
//!
//! The three knobs map as follows:
//! - `iterations`: how many offsets are hit, one per equal slice of the scan data
//! - `seed`: where inside each slice the hit lands
//! - `amount`: the byte value written (`amount / 100 * 256`), not how many bytes

use crate::params::GlitchParams;

/// Start-Of-Scan marker.
pub const SOS_MARKER: [u8; 2] = [0xFF, 0xDA];

/// Header length assumed when no Start-Of-Scan marker is present.
pub const FALLBACK_HEADER_LEN: usize = 417;

/// Trailing bytes that are never overwritten.
pub const TRAILER_LEN: usize = 4;

/// Index immediately after the first Start-Of-Scan marker.
///
/// Falls back to [`FALLBACK_HEADER_LEN`] when the marker is missing; this is
/// a heuristic, not an error.
pub fn locate_header_end(bytes: &[u8]) -> usize {
    match bytes.windows(2).position(|pair| pair == SOS_MARKER) {
        Some(pos) => pos + SOS_MARKER.len(),
        None => {
            log::debug!(
                "No SOS marker in {} bytes, assuming a {} byte header",
                bytes.len(),
                FALLBACK_HEADER_LEN
            );
            FALLBACK_HEADER_LEN
        }
    }
}

/// Byte written at every corrupted offset for a given `amount`.
///
/// `amount = 100` would give 256 and saturates to 255.
#[inline]
pub fn corruption_value(amount: u8) -> u8 {
    (u32::from(amount) * 256 / 100).min(u32::from(u8::MAX)) as u8
}

/// Offsets that [`corrupt`] overwrites, in iteration order.
///
/// The scan data between the header end and the trailer is split into
/// `iterations` equal (truncated) slices and one offset is picked per slice.
/// Offsets repeat when there are more iterations than writable bytes, and the
/// iterator is empty when nothing is writable. Every offset lies in
/// `[header_end, len - TRAILER_LEN)`.
pub fn corruption_offsets(
    bytes: &[u8],
    seed: u8,
    iterations: u32,
) -> impl Iterator<Item = usize> {
    scan_offsets(bytes.len(), locate_header_end(bytes), seed, iterations)
}

/// Offsets for a buffer of `len` bytes whose scan data starts at `header_end`.
///
/// Holds no borrow of the buffer, so callers can write while iterating.
fn scan_offsets(
    len: usize,
    header_end: usize,
    seed: u8,
    iterations: u32,
) -> impl Iterator<Item = usize> {
    let max_index = len as i64 - header_end as i64 - TRAILER_LEN as i64;

    // max_index is the first reserved trailer byte, so a hit may not land on it
    let count = if max_index > 0 { iterations } else { 0 };
    let slice = max_index as f64 / f64::from(iterations.max(1));
    let seed_fraction = f64::from(seed) / 100.0;

    (0..count).map(move |i| {
        let slice_start = (slice * f64::from(i)) as i64;
        let slice_end = (slice * (f64::from(i) + 1.0)) as i64;
        let delta = (slice_end - slice_start) as f64;
        let pixel_index = (slice_start as f64 + delta * seed_fraction) as i64;
        header_end + pixel_index.clamp(0, max_index - 1) as usize
    })
}

/// Corrupt JPEG bytes in place.
///
/// Deterministic: identical input and arguments always produce identical
/// output. Inputs too small to have writable scan data are left untouched.
pub fn corrupt(bytes: &mut [u8], seed: u8, amount: u8, iterations: u32) {
    let value = corruption_value(amount);
    let header_end = locate_header_end(bytes);

    log::debug!(
        "Corrupting {} bytes from offset {}: {} iterations of {:#04x} (seed {})",
        bytes.len(),
        header_end,
        iterations,
        value,
        seed
    );

    // iterations is unbounded, so offsets are never collected
    for offset in scan_offsets(bytes.len(), header_end, seed, iterations) {
        bytes[offset] = value;
    }
}

/// Corrupt JPEG bytes in place using sanitized parameters.
pub fn corrupt_with_params(bytes: &mut [u8], params: &GlitchParams) {
    corrupt(bytes, params.seed, params.amount, params.iterations);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Fake JPEG: a 20 byte "header" ending in an SOS marker, then scan data.
    fn fake_jpeg(scan_len: usize) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend(std::iter::repeat(0x11).take(16));
        bytes.extend_from_slice(&SOS_MARKER);
        bytes.extend(std::iter::repeat(0x22).take(scan_len));
        bytes
    }

    #[test]
    fn test_locate_header_end_finds_marker() {
        let bytes = [0x00, 0x01, 0xFF, 0xDA, 0x05];
        assert_eq!(locate_header_end(&bytes), 4);
    }

    #[test]
    fn test_locate_header_end_first_marker_wins() {
        let bytes = [0xFF, 0xDA, 0x00, 0xFF, 0xDA];
        assert_eq!(locate_header_end(&bytes), 2);
    }

    #[test]
    fn test_locate_header_end_fallback() {
        assert_eq!(locate_header_end(&[]), 417);
        assert_eq!(locate_header_end(&[0xFF]), 417);
        assert_eq!(locate_header_end(&[0xDA, 0xFF]), 417);
        assert_eq!(locate_header_end(&vec![0xAB; 4096]), 417);
    }

    #[test]
    fn test_locate_header_end_marker_at_end() {
        let bytes = [0x01, 0x02, 0xFF, 0xDA];
        assert_eq!(locate_header_end(&bytes), 4);
    }

    #[test]
    fn test_corruption_value() {
        assert_eq!(corruption_value(0), 0);
        assert_eq!(corruption_value(25), 64);
        assert_eq!(corruption_value(35), 89);
        assert_eq!(corruption_value(50), 128);
        assert_eq!(corruption_value(99), 253);
        assert_eq!(corruption_value(100), 255);
    }

    #[test]
    fn test_offsets_follow_slices() {
        // header_end = 20, max_index = 104 - 4 = 100, slices of 10 bytes
        let bytes = fake_jpeg(104);
        let offsets: Vec<usize> = corruption_offsets(&bytes, 25, 10).collect();
        assert_eq!(offsets, vec![22, 32, 42, 52, 62, 72, 82, 92, 102, 112]);
    }

    #[test]
    fn test_offsets_truncate_fractional_slices() {
        // slices of 12.5 bytes: bounds 0, 12, 25, 37, 50, 62, 75, 87, 100
        let bytes = fake_jpeg(104);
        let offsets: Vec<usize> = corruption_offsets(&bytes, 50, 8).collect();
        assert_eq!(offsets, vec![26, 38, 51, 63, 76, 88, 101, 113]);
    }

    #[test]
    fn test_seed_zero_hits_slice_starts() {
        let bytes = fake_jpeg(104);
        // max_index = 100, slices of 25
        let offsets: Vec<usize> = corruption_offsets(&bytes, 0, 4).collect();
        assert_eq!(offsets, vec![20, 45, 70, 95]);
    }

    #[test]
    fn test_seed_hundred_never_touches_trailer() {
        let bytes = fake_jpeg(104);
        let offsets: Vec<usize> = corruption_offsets(&bytes, 100, 4).collect();
        // the last slice end is clamped one short of the trailer
        assert_eq!(offsets, vec![45, 70, 95, 119]);
        assert!(offsets.iter().all(|&o| o < bytes.len() - TRAILER_LEN));
    }

    #[test]
    fn test_corrupt_writes_amount_value() {
        let mut bytes = fake_jpeg(104);
        let original = bytes.clone();
        corrupt(&mut bytes, 0, 35, 4);

        for (i, (&before, &after)) in original.iter().zip(bytes.iter()).enumerate() {
            if [20, 45, 70, 95].contains(&i) {
                assert_eq!(after, 89, "offset {i}");
            } else {
                assert_eq!(after, before, "offset {i}");
            }
        }
    }

    #[test]
    fn test_zero_amount_writes_zero() {
        let mut first = fake_jpeg(200);
        let mut second = fake_jpeg(200);
        corrupt(&mut first, 40, 0, 12);
        corrupt(&mut second, 40, 0, 12);

        assert_eq!(first, second);
        for offset in corruption_offsets(&fake_jpeg(200), 40, 12) {
            assert_eq!(first[offset], 0);
        }
    }

    #[test]
    fn test_tiny_input_untouched() {
        // marker present but no room past the trailer
        let mut bytes = vec![0xFF, 0xDA, 1, 2, 3, 4];
        let original = bytes.clone();
        corrupt(&mut bytes, 50, 50, 20);
        assert_eq!(bytes, original);
    }

    #[test]
    fn test_no_marker_short_input_untouched() {
        // 417 byte fallback header is longer than the input
        let mut bytes = vec![0x42; 300];
        let original = bytes.clone();
        corrupt(&mut bytes, 50, 50, 20);
        assert_eq!(bytes, original);
    }

    #[test]
    fn test_no_marker_long_input_uses_fallback_header() {
        let bytes = vec![0x42; 1000];
        let offsets: Vec<usize> = corruption_offsets(&bytes, 0, 5).collect();
        assert_eq!(offsets.first(), Some(&FALLBACK_HEADER_LEN));
        assert!(offsets.iter().all(|&o| o >= FALLBACK_HEADER_LEN && o < 996));
    }

    #[test]
    fn test_more_iterations_than_bytes_overlap() {
        // max_index = 3, so at most 3 distinct offsets
        let bytes = fake_jpeg(7);
        let offsets: Vec<usize> = corruption_offsets(&bytes, 25, 50).collect();
        assert_eq!(offsets.len(), 50);

        let distinct: BTreeSet<usize> = offsets.into_iter().collect();
        assert!(distinct.len() <= 3);
        assert!(distinct.iter().all(|&o| (20..23).contains(&o)));
    }

    #[test]
    fn test_huge_iteration_count_fills_scan_data() {
        let mut bytes = fake_jpeg(104);
        corrupt(&mut bytes, 25, 50, 20_000_000);

        let value = corruption_value(50);
        assert_eq!(&bytes[..20], &fake_jpeg(104)[..20]);
        assert!(bytes[20..120].iter().all(|&b| b == value));
        assert_eq!(&bytes[120..], &[0x22; 4]);
    }

    #[test]
    fn test_corrupt_with_params() {
        let mut a = fake_jpeg(500);
        let mut b = fake_jpeg(500);
        let params = GlitchParams::default();
        corrupt_with_params(&mut a, &params);
        corrupt(&mut b, params.seed, params.amount, params.iterations);
        assert_eq!(a, b);
        assert_ne!(a, fake_jpeg(500));
    }
}
