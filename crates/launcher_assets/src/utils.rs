//! Checksum helpers.
//!
//! Launchers compare a CRC-32 of the *uncompressed* file against the value they
//! already hold to decide whether a download is needed, so the checksum is always
//! taken over raw bytes, never over what the cache stores.

use flate2::Crc;

/// CRC-32 (IEEE) of a byte slice.
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(bytes);
    crc.sum()
}

/// Interpret a CRC received on the wire.
///
/// Launchers send the checksum as a signed integer that may have been widened to
/// 64 bits, so only the low 32 bits are significant.
pub fn checksum_from_wire(value: i64) -> u32 {
    value as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checksum_known_value() {
        // Standard CRC-32 check value
        assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
        assert_eq!(checksum(b""), 0);
    }

    #[test]
    fn test_checksum_from_wire() {
        assert_eq!(checksum_from_wire(0xCBF4_3926), 0xCBF4_3926);
        // Sign-extended i32 as sent by Java launchers
        assert_eq!(checksum_from_wire(0xCBF4_3926u32 as i32 as i64), 0xCBF4_3926);
        assert_eq!(checksum_from_wire(-1), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_checksum_is_stable(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            prop_assert_eq!(checksum(&bytes), checksum(&bytes.clone()));
        }

        #[test]
        fn prop_single_byte_change_alters_checksum(
            bytes in proptest::collection::vec(any::<u8>(), 1..2048),
            idx in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let mut changed = bytes.clone();
            let i = idx.index(changed.len());
            changed[i] ^= flip;
            // CRC-32 detects every single-byte error
            prop_assert_ne!(checksum(&bytes), checksum(&changed));
        }
    }
}
