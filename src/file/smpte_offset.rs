#![doc = r#"
SMPTE Offset - the start position of a track in SMPTE time code

The meta event (`FF 54 05`) carries five bytes:
- Byte 0: `0rrhhhhh` where `rr` is frame rate type, `hhhhh` is hours
- Byte 1: Minutes (0-59)
- Byte 2: Seconds (0-59)
- Byte 3: Frames (depends on frame rate)
- Byte 4: Fractional frames in 100ths (0-99)

The bytes are kept as stored so that a file re-encodes exactly;
[`SmpteOffset::validate`] checks them when needed.
"#]

use thiserror::Error;

use super::SmpteFps;

/// Errors from [`SmpteOffset::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmpteError {
    /// Hours above 23
    #[error("SMPTE hour offset {0} is above 23")]
    HourOffset(u8),
    /// Minutes above 59
    #[error("SMPTE minute offset {0} is above 59")]
    MinuteOffset(u8),
    /// Seconds above 59
    #[error("SMPTE second offset {0} is above 59")]
    SecondOffset(u8),
    /// Subframes above 99
    #[error("SMPTE subframe {0} is above 99")]
    Subframe(u8),
}

/// A track's starting position in SMPTE time code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// Rate bits and hours, `0rrhhhhh`.
    pub hour_byte: u8,
    /// Minute component of the time code
    pub minute: u8,
    /// Second component of the time code
    pub second: u8,
    /// Frame number within the current second
    pub frame: u8,
    /// Subframe component, 1/100th of a frame
    pub subframe: u8,
}

impl SmpteOffset {
    /// Build from the five payload bytes, in file order.
    pub const fn from_bytes(data: [u8; 5]) -> Self {
        Self {
            hour_byte: data[0],
            minute: data[1],
            second: data[2],
            frame: data[3],
            subframe: data[4],
        }
    }

    /// The five payload bytes, in file order.
    pub const fn to_bytes(&self) -> [u8; 5] {
        [
            self.hour_byte,
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }

    /// The frame rate encoded in the hour byte
    pub const fn fps(&self) -> SmpteFps {
        SmpteFps::from_offset_bits(self.hour_byte >> 5)
    }

    /// Hour component, without the rate bits
    pub const fn hour(&self) -> u8 {
        self.hour_byte & 0b0001_1111
    }

    /// Check every field against its range.
    pub const fn validate(&self) -> Result<(), SmpteError> {
        if self.hour() > 23 {
            return Err(SmpteError::HourOffset(self.hour()));
        }
        if self.minute > 59 {
            return Err(SmpteError::MinuteOffset(self.minute));
        }
        if self.second > 59 {
            return Err(SmpteError::SecondOffset(self.second));
        }
        if self.subframe > 99 {
            return Err(SmpteError::Subframe(self.subframe));
        }
        Ok(())
    }

    /// The offset in microseconds, at the offset's own frame rate.
    pub const fn as_micros(&self) -> f64 {
        ((((self.hour() as u64 * 3600) + (self.minute as u64) * 60 + self.second as u64)
            * 1_000_000) as f64)
            + ((self.frame as u64) * 1_000_000) as f64 / self.fps().as_f64()
            + ((self.subframe as u32) * 10_000) as f64 / self.fps().as_f64()
    }
}

#[test]
fn read_smpte_offset() {
    use pretty_assertions::assert_eq;
    // this are the bytes after 00 FF 54 05
    let offset = SmpteOffset::from_bytes([0x41, 0x17, 0x2D, 0x0C, 0x22]);

    assert_eq!(offset.fps(), SmpteFps::TwentyNine);
    assert_eq!(offset.hour(), 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);
    assert_eq!(offset.validate(), Ok(()));
    assert_eq!(offset.to_bytes(), [0x41, 0x17, 0x2D, 0x0C, 0x22]);
}

#[test]
fn invalid_smpte_offset() {
    use pretty_assertions::assert_eq;
    let offset = SmpteOffset::from_bytes([0x7F, 0x17, 0x2D, 0x0C, 0x22]);
    assert_eq!(offset.validate(), Err(SmpteError::HourOffset(31)));

    let offset = SmpteOffset::from_bytes([0x41, 0x50, 0x2D, 0x0C, 0x22]);
    assert_eq!(offset.validate(), Err(SmpteError::MinuteOffset(80)));
}

#[test]
fn offset_in_micros() {
    // 25 fps, 00:00:01, frame 5
    let offset = SmpteOffset::from_bytes([0x20, 0, 1, 5, 0]);
    assert_eq!(offset.as_micros(), 1_200_000.);
}
