#![doc = r#"
The event vocabulary shared by the decoder, the encoder and the text layer.

# Hierarchy
```text
                    |--------------|
                    | TrackMessage |
                    |--------------|
        /            /           \            \
|---------|   |------|   |-----------------|   |--------|
| Channel |   | Meta |   | System Exclusive|   | Escape |
|---------|   |------|   |-----------------|   |--------|
```
"#]

mod channel;
pub use channel::*;

mod meta;
pub use meta::*;

/// Status byte opening a system exclusive message
pub const SYSEX_STATUS: u8 = 0xF0;

/// Status byte of an escape or sysex continuation packet, and the sysex terminator
pub const ESCAPE_STATUS: u8 = 0xF7;

/// What happens at some point of a track.
///
/// Payloads are borrowed: a sink may copy or render them but cannot keep them
/// past the call it received them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMessage<'a> {
    /// A channel voice message
    Channel(ChannelEvent),
    /// A meta event
    Meta(MetaEvent<'a>),
    /// A complete system exclusive message, starting with `0xF0`
    SysEx(&'a [u8]),
    /// Arbitrary bytes sent after an `0xF7` lead byte, which is not included
    Escape(&'a [u8]),
}

/// A message, when it happens, and how long after the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEvent<'a> {
    delta: u32,
    time: u64,
    message: TrackMessage<'a>,
}

impl<'a> TrackEvent<'a> {
    /// Create a new event
    pub const fn new(delta: u32, time: u64, message: TrackMessage<'a>) -> Self {
        Self {
            delta,
            time,
            message,
        }
    }
    /// Ticks since the previous event of the track
    pub const fn delta(&self) -> u32 {
        self.delta
    }
    /// Ticks since the start of the track
    pub const fn time(&self) -> u64 {
        self.time
    }
    /// The message
    pub const fn message(&self) -> &TrackMessage<'a> {
        &self.message
    }
    /// True for the end of track meta event
    pub const fn is_end_of_track(&self) -> bool {
        matches!(self.message, TrackMessage::Meta(MetaEvent::EndOfTrack))
    }
}
