use super::{MidiSource, ReadResult, Reader, ReaderError, ReaderErrorKind};
use crate::{
    file::{
        Header,
        chunk::{HEADER_LENGTH, HEADER_TAG, TRACK_TAG},
    },
    prelude::*,
    vlq::{VlqError, read_vlq_with},
};

/// Receives the structure of a file while it is decoded.
///
/// An error returned by any method stops decoding and comes back as
/// [`ReaderErrorKind::Sink`].
pub trait SmfSink {
    /// The sink's own error
    type Error: Into<Box<dyn std::error::Error + Send + Sync>>;

    /// Called once, before any track.
    fn on_header(&mut self, header: &Header) -> Result<(), Self::Error>;

    /// Called at every `MTrk` chunk.
    fn on_track_start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for every event, in file order.
    fn on_event(&mut self, event: &TrackEvent<'_>) -> Result<(), Self::Error>;

    /// Called once the track's declared length was consumed.
    fn on_track_end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Decoding knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderOptions {
    /// Join an unterminated `F0` packet with the `F7` packets that follow it
    /// into one system exclusive message.
    pub merge_sysex: bool,
}

/// Decode a whole file held in memory with default options.
pub fn decode<S: SmfSink>(bytes: &[u8], sink: &mut S) -> ReadResult<()> {
    SmfDecoder::new(DecoderOptions::default()).decode(&mut Reader::from_byte_slice(bytes), sink)
}

#[doc = r#"
Walks the chunks of a Standard MIDI File and reports every event to a sink.

The decoder owns one growable buffer for meta and sysex payloads. It is
cleared before each event and only grows, so a decoder reused across files
settles on the size of the largest payload it met.

# Example
```rust
# use smftext::prelude::*;
# use smftext::file::Header;
#[derive(Default)]
struct Count(usize);

impl SmfSink for Count {
    type Error = std::convert::Infallible;
    fn on_header(&mut self, _: &Header) -> Result<(), Self::Error> { Ok(()) }
    fn on_event(&mut self, _: &TrackEvent<'_>) -> Result<(), Self::Error> {
        self.0 += 1;
        Ok(())
    }
}

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 8,
    0x00, 0x90, 0x3C, 0x40,
    0x00, 0xFF, 0x2F, 0x00,
];
let mut count = Count::default();
decode(&bytes, &mut count).unwrap();
assert_eq!(count.0, 2);
```
"#]
pub struct SmfDecoder {
    options: DecoderOptions,
    scratch: Vec<u8>,
}

/// A reader limited to the declared length of the current track.
struct TrackBudget<'r, R> {
    reader: &'r mut Reader<R>,
    remaining: u32,
}

impl<R: MidiSource> TrackBudget<'_, R> {
    fn byte(&mut self) -> ReadResult<u8> {
        if self.remaining == 0 {
            return Err(self.reader.error(ReaderErrorKind::ChunkOverrun));
        }
        self.remaining -= 1;
        self.reader.read_u8()
    }

    fn vlq(&mut self) -> ReadResult<u32> {
        match read_vlq_with(|| self.byte().map(Some))? {
            Ok((value, _)) => Ok(value),
            Err(VlqError::Overflow) => Err(self.reader.error(ReaderErrorKind::VlqOverflow)),
            Err(VlqError::TruncatedStream) => {
                Err(ReaderError::truncated(self.reader.buffer_position()))
            }
        }
    }

    /// Append `len` payload bytes to `buf`.
    fn payload(&mut self, buf: &mut Vec<u8>, len: u32) -> ReadResult<()> {
        if len > self.remaining {
            return Err(self.reader.error(ReaderErrorKind::ChunkOverrun));
        }
        self.remaining -= len;
        self.reader.read_into(buf, len as usize)
    }
}

fn sink_error<E: Into<Box<dyn std::error::Error + Send + Sync>>>(
    position: usize,
) -> impl FnOnce(E) -> ReaderError {
    move |e| ReaderError::new(position, ReaderErrorKind::Sink(e.into()))
}

impl SmfDecoder {
    /// A decoder with an empty scratch buffer
    pub const fn new(options: DecoderOptions) -> Self {
        Self {
            options,
            scratch: Vec::new(),
        }
    }

    /// The options in use
    pub const fn options(&self) -> DecoderOptions {
        self.options
    }

    /// Decode the header and then every track until the source ends.
    pub fn decode<R: MidiSource, S: SmfSink>(
        &mut self,
        reader: &mut Reader<R>,
        sink: &mut S,
    ) -> ReadResult<()> {
        self.decode_header(reader, sink)?;
        let mut track = 0usize;
        while let Some(tag) = reader.read_chunk_tag()? {
            if tag != TRACK_TAG {
                return Err(reader.error(ReaderErrorKind::ExpectedTrackChunk(tag)));
            }
            let length = reader.read_u32()?;
            track += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!("track {track}: {length} bytes at {}", reader.buffer_position());
            self.decode_track(reader, length, sink)?;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("decoded {track} tracks");
        Ok(())
    }

    fn decode_header<R: MidiSource, S: SmfSink>(
        &mut self,
        reader: &mut Reader<R>,
        sink: &mut S,
    ) -> ReadResult<()> {
        match reader.read_chunk_tag()? {
            Some(tag) if tag == HEADER_TAG => {}
            _ => return Err(reader.error(ReaderErrorKind::ExpectedHeaderChunk)),
        }
        let length = reader.read_u32()?;
        if length != HEADER_LENGTH {
            return Err(reader.error(ReaderErrorKind::InvalidHeaderLength(length)));
        }
        let header = Header::from_bytes(reader.read_exact_size()?);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "header: format {}, {} tracks, {:?}",
            header.format_raw(),
            header.track_count(),
            header.division()
        );
        sink.on_header(&header)
            .map_err(sink_error(reader.buffer_position()))
    }

    fn decode_track<R: MidiSource, S: SmfSink>(
        &mut self,
        reader: &mut Reader<R>,
        length: u32,
        sink: &mut S,
    ) -> ReadResult<()> {
        sink.on_track_start()
            .map_err(sink_error(reader.buffer_position()))?;

        let mut budget = TrackBudget {
            reader,
            remaining: length,
        };
        let mut running_status: Option<u8> = None;
        let mut time: u64 = 0;
        let mut pending_sysex = false;
        // delta of a split sysex is the delta of its first packet
        let mut sysex_delta = 0u32;
        let mut sysex_time = 0u64;

        while budget.remaining > 0 {
            let delta = budget.vlq()?;
            time += delta as u64;
            let mut status = budget.byte()?;

            if pending_sysex && status != ESCAPE_STATUS {
                return Err(budget
                    .reader
                    .error(ReaderErrorKind::ExpectedSysexContinuation(status)));
            }

            let mut first_data = None;
            if status & 0x80 == 0 {
                let Some(running) = running_status else {
                    return Err(budget.reader.error(ReaderErrorKind::UnexpectedRunningStatus));
                };
                first_data = Some(status);
                status = running;
            } else if status < SYSEX_STATUS {
                running_status = Some(status);
            }

            let position = budget.reader.buffer_position();
            match status {
                0x80..=0xEF => {
                    let d0 = match first_data {
                        Some(d) => d,
                        None => budget.byte()?,
                    };
                    let d1 = match VoiceKind::from_status(status).map(VoiceKind::data_len) {
                        Some(2) => budget.byte()?,
                        _ => 0,
                    };
                    let event = match ChannelEvent::from_status(status, [d0, d1]) {
                        Some(Ok(event)) => event,
                        Some(Err(DataByteError(byte))) => {
                            return Err(budget.reader.error(ReaderErrorKind::InvalidDataByte(byte)));
                        }
                        None => return Err(budget.reader.error(ReaderErrorKind::MalformedEvent(status))),
                    };
                    let event = TrackEvent::new(delta, time, TrackMessage::Channel(event));
                    #[cfg(feature = "tracing")]
                    tracing::trace!("{event:?}");
                    sink.on_event(&event).map_err(sink_error(position))?;
                }
                META_STATUS => {
                                        let kind = budget.byte()?;
                    let len = budget.vlq()?;
                    self.scratch.clear();
                    budget.payload(&mut self.scratch, len)?;
                    let meta = MetaEvent::parse(kind, &self.scratch);
                    let event = TrackEvent::new(delta, time, TrackMessage::Meta(meta));
                    #[cfg(feature = "tracing")]
                    tracing::trace!("{event:?}");
                    sink.on_event(&event).map_err(sink_error(position))?;
                }
                SYSEX_STATUS => {
                                        let len = budget.vlq()?;
                    self.scratch.clear();
                    self.scratch.push(SYSEX_STATUS);
                    budget.payload(&mut self.scratch, len)?;
                    let terminated = self.scratch.last() == Some(&ESCAPE_STATUS);
                    if terminated || !self.options.merge_sysex {
                        let event = TrackEvent::new(delta, time, TrackMessage::SysEx(&self.scratch));
                        #[cfg(feature = "tracing")]
                        tracing::trace!("{event:?}");
                        sink.on_event(&event).map_err(sink_error(position))?;
                    } else {
                        pending_sysex = true;
                        sysex_delta = delta;
                        sysex_time = time;
                    }
                }
                ESCAPE_STATUS => {
                                        let len = budget.vlq()?;
                    if pending_sysex {
                        budget.payload(&mut self.scratch, len)?;
                        if self.scratch.last() == Some(&ESCAPE_STATUS) {
                            pending_sysex = false;
                            let event = TrackEvent::new(
                                sysex_delta,
                                sysex_time,
                                TrackMessage::SysEx(&self.scratch),
                            );
                            #[cfg(feature = "tracing")]
                            tracing::trace!("{event:?}");
                            sink.on_event(&event).map_err(sink_error(position))?;
                        }
                    } else {
                        self.scratch.clear();
                        budget.payload(&mut self.scratch, len)?;
                        let event = TrackEvent::new(delta, time, TrackMessage::Escape(&self.scratch));
                        #[cfg(feature = "tracing")]
                        tracing::trace!("{event:?}");
                        sink.on_event(&event).map_err(sink_error(position))?;
                    }
                }
                other => {
                    return Err(budget.reader.error(ReaderErrorKind::MalformedEvent(other)));
                }
            }
        }

        if pending_sysex {
            return Err(budget.reader.error(ReaderErrorKind::UnterminatedSysex));
        }
        sink.on_track_end()
            .map_err(sink_error(budget.reader.buffer_position()))
    }
}
