use crate::constants::framing::CRC_MASK_DELTA;

/// Masked CRC-32C as stored in snappy framing chunks.
///
/// Raw CRCs of data that itself embeds CRCs are prone to collisions, so the
/// framing format rotates right by 15 and adds a constant.
#[inline]
pub fn masked_crc32c(data: &[u8]) -> u32 {
    mask_crc(crc32c::crc32c(data))
}

#[inline]
pub fn mask_crc(crc: u32) -> u32 {
    ((crc >> 15) | (crc << 17)).wrapping_add(CRC_MASK_DELTA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32c_known_vector() {
        // RFC 3720 B.4: 32 bytes of zeroes.
        assert_eq!(crc32c::crc32c(&[0u8; 32]), 0x8a91_36aa);
    }

    #[test]
    fn masking_is_rotation_plus_delta() {
        let crc = crc32c::crc32c(b"sNaPpY");
        let expected = crc.rotate_right(15).wrapping_add(0xa282_ead8);
        assert_eq!(masked_crc32c(b"sNaPpY"), expected);
        assert_eq!(mask_crc(0), 0xa282_ead8);
    }
}
