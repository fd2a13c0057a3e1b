#![doc = r#"
Channel voice events

# Status byte
```text
1sss_cccc
 |    |
 |    +-- channel (0-15, shown as 1-16)
 +------- kind (note off ... pitch bend)
```
Program change and channel pressure carry one data byte, every other kind
carries two.
"#]

use core::fmt;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{DataByte, DataByteError, Note};

/// The upper nibble of a channel voice status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum VoiceKind {
    /// `0x8n`
    NoteOff = 0x8,
    /// `0x9n`
    NoteOn = 0x9,
    /// `0xAn`, polyphonic key pressure
    PolyPressure = 0xA,
    /// `0xBn`
    ControlChange = 0xB,
    /// `0xCn`
    ProgramChange = 0xC,
    /// `0xDn`
    ChannelPressure = 0xD,
    /// `0xEn`
    PitchBend = 0xE,
}

impl VoiceKind {
    /// Identify the kind from a full status byte (`0x80..=0xEF`).
    pub fn from_status(status: u8) -> Option<Self> {
        Self::try_from(status >> 4).ok()
    }

    /// The status byte with a zero channel
    pub fn status(self) -> u8 {
        u8::from(self) << 4
    }

    /// How many data bytes follow the status byte
    pub const fn data_len(self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

/// A MIDI channel, stored as 0-15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel(u8);

impl Channel {
    /// From a zero based index, `None` above 15.
    pub const fn new(index: u8) -> Option<Self> {
        if index > 15 { None } else { Some(Self(index)) }
    }
    /// From the lower nibble of a status byte.
    pub const fn from_status(status: u8) -> Self {
        Self(status & 0x0F)
    }
    /// Zero based index
    pub const fn index(&self) -> u8 {
        self.0
    }
    /// One based channel number, as shown to people
    pub const fn number(&self) -> u8 {
        self.0 + 1
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.number().fmt(f)
    }
}

#[doc = r#"
The payload of a channel voice event.

# Example
```rust
# use smftext::prelude::*;
let event = VoiceEvent::from_data(VoiceKind::PitchBend, [0x00, 0x40]).unwrap();
assert_eq!(event, VoiceEvent::PitchBend(8192));
assert_eq!(event.data(), ([0x00, 0x40], 2));
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceEvent {
    /// Release a key
    NoteOff {
        /// The key
        note: Note,
        /// Release velocity
        velocity: DataByte,
    },
    /// Press a key
    NoteOn {
        /// The key
        note: Note,
        /// Attack velocity
        velocity: DataByte,
    },
    /// Aftertouch on a single key
    PolyPressure {
        /// The key
        note: Note,
        /// Pressure amount
        pressure: DataByte,
    },
    /// Set a controller
    ControlChange {
        /// Controller number
        controller: DataByte,
        /// Controller value
        value: DataByte,
    },
    /// Select a program
    ProgramChange {
        /// Program number
        program: DataByte,
    },
    /// Aftertouch for the whole channel
    ChannelPressure {
        /// Pressure amount
        pressure: DataByte,
    },
    /// 14-bit pitch wheel position, 8192 is centered
    PitchBend(u16),
}

impl VoiceEvent {
    /// Build from a kind and its data bytes. The second byte is ignored by
    /// one byte kinds.
    pub fn from_data(kind: VoiceKind, data: [u8; 2]) -> Result<Self, DataByteError> {
        let first = DataByte::new(data[0])?;
        let second = || DataByte::new(data[1]);
        Ok(match kind {
            VoiceKind::NoteOff => Self::NoteOff {
                note: Note::from_byte(first),
                velocity: second()?,
            },
            VoiceKind::NoteOn => Self::NoteOn {
                note: Note::from_byte(first),
                velocity: second()?,
            },
            VoiceKind::PolyPressure => Self::PolyPressure {
                note: Note::from_byte(first),
                pressure: second()?,
            },
            VoiceKind::ControlChange => Self::ControlChange {
                controller: first,
                value: second()?,
            },
            VoiceKind::ProgramChange => Self::ProgramChange { program: first },
            VoiceKind::ChannelPressure => Self::ChannelPressure { pressure: first },
            VoiceKind::PitchBend => {
                let msb = second()?;
                Self::PitchBend(((msb.value() as u16) << 7) | first.value() as u16)
            }
        })
    }

    /// The kind of the event
    pub const fn kind(&self) -> VoiceKind {
        match self {
            Self::NoteOff { .. } => VoiceKind::NoteOff,
            Self::NoteOn { .. } => VoiceKind::NoteOn,
            Self::PolyPressure { .. } => VoiceKind::PolyPressure,
            Self::ControlChange { .. } => VoiceKind::ControlChange,
            Self::ProgramChange { .. } => VoiceKind::ProgramChange,
            Self::ChannelPressure { .. } => VoiceKind::ChannelPressure,
            Self::PitchBend(_) => VoiceKind::PitchBend,
        }
    }

    /// The data bytes as written to a file, and how many of them are used.
    pub const fn data(&self) -> ([u8; 2], usize) {
        match *self {
            Self::NoteOff { note, velocity } | Self::NoteOn { note, velocity } => {
                ([note.byte(), velocity.value()], 2)
            }
            Self::PolyPressure { note, pressure } => ([note.byte(), pressure.value()], 2),
            Self::ControlChange { controller, value } => {
                ([controller.value(), value.value()], 2)
            }
            Self::ProgramChange { program } => ([program.value(), 0], 1),
            Self::ChannelPressure { pressure } => ([pressure.value(), 0], 1),
            Self::PitchBend(value) => ([(value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8], 2),
        }
    }
}

/// A channel voice event: a channel plus what happens on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelEvent {
    /// Create a new channel event
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }
    /// Decode a status byte (`0x80..=0xEF`) and its data.
    ///
    /// Returns `None` if `status` is not a channel voice status.
    pub fn from_status(status: u8, data: [u8; 2]) -> Option<Result<Self, DataByteError>> {
        let kind = VoiceKind::from_status(status)?;
        Some(VoiceEvent::from_data(kind, data).map(|event| Self {
            channel: Channel::from_status(status),
            event,
        }))
    }
    /// The channel
    pub const fn channel(&self) -> Channel {
        self.channel
    }
    /// The payload
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }
    /// The full status byte
    pub fn status(&self) -> u8 {
        self.event.kind().status() | self.channel.index()
    }
}

#[test]
fn status_round_trip() {
    for status in 0x80..=0xEFu8 {
        let event = ChannelEvent::from_status(status, [0x40, 0x7F]).unwrap().unwrap();
        assert_eq!(event.status(), status);
        let (data, len) = event.event().data();
        assert_eq!(len, VoiceKind::from_status(status).unwrap().data_len());
        assert_eq!(data[0], 0x40);
    }
    assert!(ChannelEvent::from_status(0xF0, [0, 0]).is_none());
}

#[test]
fn data_bytes_must_be_seven_bit() {
    assert_eq!(
        ChannelEvent::from_status(0x90, [0x40, 0x80]),
        Some(Err(DataByteError(0x80)))
    );
}
