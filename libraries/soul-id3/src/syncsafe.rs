//! Sync-safe integers and the unsynchronisation scheme
//!
//! ID3v2 stores most sizes as 28-bit integers spread over four bytes whose
//! high bit is always clear, so no size field can look like an MPEG sync
//! word. The same concern drives unsynchronisation: every `0xFF` that could
//! start a false sync is followed by a stuffed `0x00`.

use byteorder::{BigEndian, ByteOrder};

/// Largest value a 4-byte sync-safe integer can carry
pub const MAX_SYNC_SAFE: u32 = 0x0FFF_FFFF;

/// Decode four sync-safe bytes
pub fn decode(bytes: [u8; 4]) -> u32 {
    (u32::from(bytes[0] & 0x7F) << 21)
        | (u32::from(bytes[1] & 0x7F) << 14)
        | (u32::from(bytes[2] & 0x7F) << 7)
        | u32::from(bytes[3] & 0x7F)
}

/// Encode a value as four sync-safe bytes
///
/// Bits above the 28th are discarded.
pub fn encode(value: u32) -> [u8; 4] {
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

/// Whether any byte has bit 7 set, i.e. the field was written as a plain
/// big-endian integer where a sync-safe one was required
pub fn looks_not_sync_safe(bytes: &[u8]) -> bool {
    bytes.iter().any(|b| b & 0x80 != 0)
}

/// Padding detector
pub fn is_all_zero(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

/// Decode a plain big-endian size of 3 or 4 bytes
pub fn decode_plain(bytes: &[u8]) -> u32 {
    match bytes.len() {
        3 => BigEndian::read_u24(bytes),
        4 => BigEndian::read_u32(bytes),
        _ => bytes
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
    }
}

/// Encode `value` as a plain big-endian size of `width` (3 or 4) bytes
pub fn encode_plain(value: u32, width: usize) -> Vec<u8> {
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, value);
    buf[4 - width.min(4)..].to_vec()
}

/// Decode the 5-byte, 35-bit sync-safe CRC of a v2.4 extended header
pub fn decode_crc(bytes: [u8; 5]) -> u32 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| (acc << 7) | u64::from(b & 0x7F)) as u32
}

/// Encode a CRC-32 as the 5-byte sync-safe form used by v2.4
pub fn encode_crc(crc: u32) -> [u8; 5] {
    let value = u64::from(crc);
    [
        ((value >> 28) & 0x7F) as u8,
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

/// Whether `data` contains a byte pair that unsynchronisation would rewrite
pub fn needs_unsynchronisation(data: &[u8]) -> bool {
    data.windows(2)
        .any(|w| w[0] == 0xFF && (w[1] >= 0xE0 || w[1] == 0x00))
        || data.last() == Some(&0xFF)
}

/// Apply the unsynchronisation scheme
pub fn unsynchronise(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 16);
    for (i, &byte) in data.iter().enumerate() {
        out.push(byte);
        if byte == 0xFF {
            match data.get(i + 1) {
                Some(&next) if next < 0xE0 && next != 0x00 => {}
                _ => out.push(0x00),
            }
        }
    }
    out
}

/// Reverse the unsynchronisation scheme
pub fn resynchronise(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut previous_ff = false;
    for &byte in data {
        if previous_ff && byte == 0x00 {
            previous_ff = false;
            continue;
        }
        out.push(byte);
        previous_ff = byte == 0xFF;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(encode(0), [0, 0, 0, 0]);
        assert_eq!(encode(127), [0, 0, 0, 0x7F]);
        assert_eq!(encode(128), [0, 0, 1, 0]);
        assert_eq!(encode(MAX_SYNC_SAFE), [0x7F, 0x7F, 0x7F, 0x7F]);
        assert_eq!(decode([0x00, 0x00, 0x02, 0x01]), 257);
    }

    #[test]
    fn encode_masks_to_28_bits() {
        assert_eq!(encode(MAX_SYNC_SAFE + 1), [0, 0, 0, 0]);
    }

    #[test]
    fn detects_plain_sizes() {
        assert!(looks_not_sync_safe(&[0x00, 0x00, 0x00, 0x80]));
        assert!(!looks_not_sync_safe(&encode(4096)));
    }

    #[test]
    fn padding_detection() {
        assert!(is_all_zero(&[0, 0, 0, 0]));
        assert!(is_all_zero(&[]));
        assert!(!is_all_zero(&[0, 0, 1]));
    }

    #[test]
    fn plain_sizes() {
        assert_eq!(decode_plain(&[0x01, 0x00, 0x00]), 65536);
        assert_eq!(decode_plain(&[0x00, 0x00, 0x01, 0x00]), 256);
        assert_eq!(encode_plain(65536, 3), vec![0x01, 0x00, 0x00]);
        assert_eq!(encode_plain(256, 4), vec![0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn crc_roundtrip() {
        let crc = 0xDEAD_BEEF;
        let bytes = encode_crc(crc);
        assert!(!looks_not_sync_safe(&bytes));
        assert_eq!(decode_crc(bytes), crc);
    }

    #[test]
    fn unsynchronisation_stuffs_false_syncs() {
        let data = [0xFF, 0xE0, 0x12, 0xFF, 0x00, 0xFF];
        let stuffed = unsynchronise(&data);
        assert_eq!(stuffed, vec![0xFF, 0x00, 0xE0, 0x12, 0xFF, 0x00, 0x00, 0xFF, 0x00]);
        assert_eq!(resynchronise(&stuffed), data);
        assert!(needs_unsynchronisation(&data));
        assert!(!needs_unsynchronisation(&[0xFF, 0x12]));
    }
}
