use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The layout of the tracks in a file, as stored in the header chunk.

Only formats 0, 1 and 2 are defined; anything above is refused when rendering.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Format {
    /// Format 0: one track holding every channel
    SingleMultiChannel = 0,
    /// Format 1: tracks played together, the first usually holding the tempo map
    Simultaneous = 1,
    /// Format 2: independent single-track patterns
    SequentiallyIndependent = 2,
}

impl Format {
    /// The raw header value
    pub fn value(self) -> u16 {
        self.into()
    }
}

#[test]
fn formats_above_two_are_unknown() {
    assert_eq!(Format::try_from(1u16), Ok(Format::Simultaneous));
    assert!(Format::try_from(3u16).is_err());
    assert_eq!(Format::SequentiallyIndependent.value(), 2);
}
