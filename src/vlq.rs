#![doc = r#"
Variable-length quantities

Delta times and meta/sysex lengths are stored big-endian, seven bits per
byte. Every byte except the last has its top bit set.

```text
0x00000000 -> 00
0x00000040 -> 40
0x00002000 -> C0 00
0x0FFFFFFF -> FF FF FF 7F
```
"#]

use core::ops::Deref;
use thiserror::Error;

/// The largest value a four byte quantity can hold.
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

/// The longest encoding accepted while decoding.
pub const MAX_VLQ_BYTES: usize = 4;

/// Errors from [`decode_vlq`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VlqError {
    /// The source ended before a byte with a clear top bit.
    #[error("stream ended inside a variable-length quantity")]
    TruncatedStream,
    /// More than [`MAX_VLQ_BYTES`] bytes had their top bit set.
    #[error("variable-length quantity is longer than {MAX_VLQ_BYTES} bytes")]
    Overflow,
}

/// Reads one quantity, pulling bytes from `next_byte`.
///
/// `next_byte` returns `Ok(None)` at the end of its source.
pub(crate) fn read_vlq_with<E>(
    mut next_byte: impl FnMut() -> Result<Option<u8>, E>,
) -> Result<Result<(u32, usize), VlqError>, E> {
    let mut value: u32 = 0;
    for consumed in 1..=MAX_VLQ_BYTES {
        let Some(byte) = next_byte()? else {
            return Ok(Err(VlqError::TruncatedStream));
        };
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok(Ok((value, consumed)));
        }
    }
    Ok(Err(VlqError::Overflow))
}

/// Decodes a quantity from the front of `source`.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode_vlq(source: &[u8]) -> Result<(u32, usize), VlqError> {
    let mut bytes = source.iter().copied();
    match read_vlq_with::<core::convert::Infallible>(|| Ok(bytes.next())) {
        Ok(res) => res,
        Err(never) => match never {},
    }
}

/// Minimal big-endian encoding of a quantity, at most five bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlqBytes {
    buf: [u8; 5],
    len: u8,
}

impl Deref for VlqBytes {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.buf[5 - self.len as usize..]
    }
}

impl AsRef<[u8]> for VlqBytes {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

/// Encodes `value` using as few bytes as possible. `0` encodes as a single `0x00`.
///
/// Values above [`MAX_VLQ`] take five bytes, which the decoder refuses.
pub fn encode_vlq(mut value: u32) -> VlqBytes {
    let mut buf = [0u8; 5];
    let mut idx = 4;
    buf[idx] = (value & 0x7F) as u8;
    value >>= 7;
    while value > 0 {
        idx -= 1;
        buf[idx] = 0x80 | (value & 0x7F) as u8;
        value >>= 7;
    }
    VlqBytes {
        buf,
        len: (5 - idx) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_encodings() {
        assert_eq!(&*encode_vlq(0), &[0x00]);
        assert_eq!(&*encode_vlq(0x40), &[0x40]);
        assert_eq!(&*encode_vlq(0x7F), &[0x7F]);
        assert_eq!(&*encode_vlq(0x80), &[0x81, 0x00]);
        assert_eq!(&*encode_vlq(0x2000), &[0xC0, 0x00]);
        assert_eq!(&*encode_vlq(0x1F_FFFF), &[0xFF, 0xFF, 0x7F]);
        assert_eq!(&*encode_vlq(0x20_0000), &[0x81, 0x80, 0x80, 0x00]);
        assert_eq!(&*encode_vlq(MAX_VLQ), &[0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn round_trips_at_boundaries() {
        for shift in 0..28 {
            for v in [(1u32 << shift) - 1, 1 << shift, (1 << shift) + 1] {
                if v > MAX_VLQ {
                    continue;
                }
                let bytes = encode_vlq(v);
                assert_eq!(decode_vlq(&bytes), Ok((v, bytes.len())));
            }
        }
    }

    #[test]
    fn decode_stops_at_clear_bit() {
        assert_eq!(decode_vlq(&[0x81, 0x00, 0x55]), Ok((0x80, 2)));
    }

    #[test]
    fn decode_errors() {
        assert_eq!(decode_vlq(&[]), Err(VlqError::TruncatedStream));
        assert_eq!(decode_vlq(&[0x81, 0x80]), Err(VlqError::TruncatedStream));
        assert_eq!(
            decode_vlq(&[0x81, 0x80, 0x80, 0x80, 0x00]),
            Err(VlqError::Overflow)
        );
    }
}
