#![doc = r#"
Meta events (`FF <type> <length> <data>`)

Meta events never reach a MIDI device; they describe the sequence: names,
tempo, time and key signatures and the end of each track.

A typed meta event whose payload has the wrong size is kept as
[`MetaEvent::Unknown`] so that its bytes survive a round trip.
"#]

use num_enum::{FromPrimitive, IntoPrimitive, TryFromPrimitive};

use crate::file::SmpteOffset;

/// Status byte introducing a meta event
pub const META_STATUS: u8 = 0xFF;

/// The type byte of the meta events with a dedicated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MetaType {
    /// `FF 00 02 ssss`
    SequenceNumber = 0x00,
    /// `FF 2F 00`
    EndOfTrack = 0x2F,
    /// `FF 51 03 tttttt`
    Tempo = 0x51,
    /// `FF 54 05 hr mn se fr ff`
    SmpteOffset = 0x54,
    /// `FF 58 04 nn dd cc bb`
    TimeSignature = 0x58,
    /// `FF 59 02 sf mi`
    KeySignature = 0x59,
    /// `FF 7F len data`
    SequencerSpecific = 0x7F,
}

/// Meta types `0x01..=0x0F` all carry text.
pub const TEXT_TYPES: core::ops::RangeInclusive<u8> = 0x01..=0x0F;

#[doc = r#"
The flavour of a text meta event.

Types 8 to 15 are reserved for text but have no agreed meaning, they are
kept by number.

# Example
```rust
# use smftext::prelude::*;
assert_eq!(TextKind::from(0x03), TextKind::TrackName);
assert_eq!(TextKind::from(0x0A), TextKind::Unrecognized(0x0A));
assert_eq!(u8::from(TextKind::Unrecognized(0x0A)), 0x0A);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TextKind {
    /// Any text
    Text = 0x01,
    /// Copyright notice
    Copyright = 0x02,
    /// Sequence or track name
    TrackName = 0x03,
    /// Instrument name
    InstrumentName = 0x04,
    /// Lyric syllable
    Lyric = 0x05,
    /// Rehearsal letter, section name
    Marker = 0x06,
    /// Description of something happening on a stage or film
    CuePoint = 0x07,
    /// Any other text type
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

impl From<TextKind> for u8 {
    fn from(kind: TextKind) -> u8 {
        match kind {
            TextKind::Text => 0x01,
            TextKind::Copyright => 0x02,
            TextKind::TrackName => 0x03,
            TextKind::InstrumentName => 0x04,
            TextKind::Lyric => 0x05,
            TextKind::Marker => 0x06,
            TextKind::CuePoint => 0x07,
            TextKind::Unrecognized(kind) => kind,
        }
    }
}

/// `FF 58 04 nn dd cc bb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per measure
    pub numerator: u8,
    /// The denominator as a power of two (`2` is a quarter note)
    pub denominator_pow: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes per 24 MIDI clocks
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// `2 ^ denominator_pow`, or `None` if it does not fit a `u32`.
    pub const fn denominator(&self) -> Option<u32> {
        1u32.checked_shl(self.denominator_pow as u32)
    }

    /// The payload bytes
    pub const fn to_bytes(&self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_pow,
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]
    }
}

/// `FF 59 02 sf mi`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Sharps when positive, flats when negative
    pub fifths: i8,
    /// Minor key if set
    pub minor: bool,
}

impl KeySignature {
    /// The payload bytes
    pub const fn to_bytes(&self) -> [u8; 2] {
        [self.fifths as u8, self.minor as u8]
    }
}

/// A decoded meta event, borrowing its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaEvent<'a> {
    /// Number of the sequence or pattern
    SequenceNumber(u16),
    /// Any text meta event
    Text {
        /// Which kind of text
        kind: TextKind,
        /// Raw bytes, usually ASCII
        text: &'a [u8],
    },
    /// Last event of every track
    EndOfTrack,
    /// Microseconds per quarter note (24 bits)
    Tempo(u32),
    /// Start position of the track
    SmpteOffset(SmpteOffset),
    /// Time signature
    TimeSignature(TimeSignature),
    /// Key signature
    KeySignature(KeySignature),
    /// Opaque data for a specific sequencer
    SequencerSpecific(&'a [u8]),
    /// Any other meta event, tagged by its raw type byte
    Unknown {
        /// The type byte
        kind: u8,
        /// The payload
        data: &'a [u8],
    },
}

impl<'a> MetaEvent<'a> {
    /// Interpret a type byte and its payload.
    pub fn parse(kind: u8, data: &'a [u8]) -> Self {
        if TEXT_TYPES.contains(&kind) {
            return Self::Text {
                kind: TextKind::from(kind),
                text: data,
            };
        }
        let unknown = Self::Unknown { kind, data };
        let Ok(meta_type) = MetaType::try_from(kind) else {
            return unknown;
        };
        match (meta_type, data) {
            (MetaType::SequenceNumber, &[hi, lo]) => Self::SequenceNumber(u16::from_be_bytes([hi, lo])),
            (MetaType::EndOfTrack, []) => Self::EndOfTrack,
            (MetaType::Tempo, &[a, b, c]) => Self::Tempo(u32::from_be_bytes([0, a, b, c])),
            (MetaType::SmpteOffset, &[hr, mn, se, fr, ff]) => {
                Self::SmpteOffset(SmpteOffset::from_bytes([hr, mn, se, fr, ff]))
            }
            (MetaType::TimeSignature, &[nn, dd, cc, bb]) => Self::TimeSignature(TimeSignature {
                numerator: nn,
                denominator_pow: dd,
                clocks_per_click: cc,
                thirty_seconds_per_quarter: bb,
            }),
            (MetaType::KeySignature, &[sf, mi]) => Self::KeySignature(KeySignature {
                fifths: sf as i8,
                minor: mi != 0,
            }),
            (MetaType::SequencerSpecific, data) => Self::SequencerSpecific(data),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "meta event 0x{kind:02x} has an unexpected length of {}, kept as opaque data",
                    data.len()
                );
                unknown
            }
        }
    }

    /// The type byte
    pub fn kind(&self) -> u8 {
        match self {
            Self::SequenceNumber(_) => MetaType::SequenceNumber.into(),
            Self::Text { kind, .. } => (*kind).into(),
            Self::EndOfTrack => MetaType::EndOfTrack.into(),
            Self::Tempo(_) => MetaType::Tempo.into(),
            Self::SmpteOffset(_) => MetaType::SmpteOffset.into(),
            Self::TimeSignature(_) => MetaType::TimeSignature.into(),
            Self::KeySignature(_) => MetaType::KeySignature.into(),
            Self::SequencerSpecific(_) => MetaType::SequencerSpecific.into(),
            Self::Unknown { kind, .. } => *kind,
        }
    }

    /// The payload as it is written to a file.
    ///
    /// Fixed size payloads are assembled into `scratch`.
    pub fn payload<'s>(&'s self, scratch: &'s mut [u8; 5]) -> &'s [u8]
    where
        'a: 's,
    {
        let len = match self {
            Self::Text { text: data, .. }
            | Self::SequencerSpecific(data)
            | Self::Unknown { data, .. } => return *data,
            Self::EndOfTrack => 0,
            Self::SequenceNumber(n) => {
                scratch[..2].copy_from_slice(&n.to_be_bytes());
                2
            }
            Self::Tempo(t) => {
                scratch[..3].copy_from_slice(&t.to_be_bytes()[1..]);
                3
            }
            Self::SmpteOffset(o) => {
                scratch.copy_from_slice(&o.to_bytes());
                5
            }
            Self::TimeSignature(t) => {
                scratch[..4].copy_from_slice(&t.to_bytes());
                4
            }
            Self::KeySignature(k) => {
                scratch[..2].copy_from_slice(&k.to_bytes());
                2
            }
        };
        &scratch[..len]
    }
}
