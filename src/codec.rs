use crate::errors::{VoteClientError, VoteResult};

/// Width of the vote id and option fields, both in instructions and records
pub const LE64_LEN: usize = 8;

/// Encodes `value` as 8 little-endian bytes, low byte first.
pub fn encode_le64(value: u64) -> [u8; LE64_LEN] {
    value.to_le_bytes()
}

/// Encodes any integer that fits in a `u64`.
///
/// Negative values and values above `u64::MAX` are rejected with
/// [`VoteClientError::OutOfRange`].
pub fn try_encode_le64<T>(value: T) -> VoteResult<[u8; LE64_LEN]>
where
    T: TryInto<u64> + Copy + ToString,
{
    value
        .try_into()
        .map(encode_le64)
        .map_err(|_| VoteClientError::OutOfRange(value.to_string()))
}

/// Reads up to 8 bytes as an unsigned little-endian integer.
///
/// Shorter inputs are zero extended at the high end; the trailing option field
/// of a vote record is decoded this way over whatever bytes remain.
pub fn decode_le(bytes: &[u8]) -> VoteResult<u64> {
    if bytes.len() > LE64_LEN {
        return Err(VoteClientError::IntegerTooWide(bytes.len()));
    }
    let mut buf = [0u8; LE64_LEN];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(u64::from_le_bytes(buf))
}

/// Combines four little-endian bytes into a `u32`.
pub fn decode_le_u32(bytes: &[u8; 4]) -> u32 {
    u32::from(bytes[0])
        | u32::from(bytes[1]) << 8
        | u32::from(bytes[2]) << 16
        | u32::from(bytes[3]) << 24
}
