use super::{Division, Format};

#[doc = r#"
The contents of the `MThd` chunk.

The format is kept raw so that files claiming an undefined format still
decode; [`Header::format`] interprets it.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: u16,
    track_count: u16,
    division: Division,
}

impl Header {
    /// Create a new header
    pub const fn new(format: u16, track_count: u16, division: Division) -> Self {
        Self {
            format,
            track_count,
            division,
        }
    }
    /// Read the 6 byte chunk body.
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self {
            format: u16::from_be_bytes([bytes[0], bytes[1]]),
            track_count: u16::from_be_bytes([bytes[2], bytes[3]]),
            division: Division::from_raw(u16::from_be_bytes([bytes[4], bytes[5]])),
        }
    }
    /// The 6 byte chunk body.
    pub const fn to_bytes(&self) -> [u8; 6] {
        let f = self.format.to_be_bytes();
        let n = self.track_count.to_be_bytes();
        let d = self.division.raw().to_be_bytes();
        [f[0], f[1], n[0], n[1], d[0], d[1]]
    }
    /// The raw format number
    pub const fn format_raw(&self) -> u16 {
        self.format
    }
    /// The format, if it is one of 0, 1 or 2
    pub fn format(&self) -> Option<Format> {
        Format::try_from(self.format).ok()
    }
    /// Number of track chunks announced
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }
    /// Get the division
    pub const fn division(&self) -> &Division {
        &self.division
    }
}

#[test]
fn header_bytes() {
    let header = Header::from_bytes([0, 1, 0, 2, 0, 96]);
    assert_eq!(header.format(), Some(Format::Simultaneous));
    assert_eq!(header.track_count(), 2);
    assert_eq!(header.division(), &Division::TicksPerQuarterNote(96));
    assert_eq!(header.to_bytes(), [0, 1, 0, 2, 0, 96]);
}
