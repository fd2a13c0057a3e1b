use super::{MidiSink, WriteError, WriteResult};
use crate::{
    file::{
        Header,
        chunk::{CHUNK_PREFIX_LENGTH, HEADER_LENGTH, HEADER_TAG, TRACK_TAG, chunk_prefix},
    },
    prelude::*,
    vlq::MAX_VLQ,
};

/// Encoding knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriterOptions {
    /// Leave out a channel status byte that repeats the previous one.
    pub running_status: bool,
}

#[doc = r#"
Writes a Standard MIDI File to a [`MidiSink`].

# Example
```rust
# use smftext::prelude::*;
let header = Header::new(0, 1, Division::TicksPerQuarterNote(96));
let mut writer = SmfWriter::begin_file(Vec::new(), &header, WriterOptions::default()).unwrap();
writer
    .write_track(|track| {
        track.emit_channel_event(0, 0x90, 0, &[60, 100])?;
        track.emit_channel_event(96, 0x80, 0, &[60, 0])
    })
    .unwrap();
let bytes = writer.into_inner();
// 8 bytes of events and the appended end of track
assert_eq!(&bytes[18..22], &[0, 0, 0, 12]);
assert_eq!(&bytes[bytes.len() - 4..], &[0x00, 0xFF, 0x2F, 0x00]);
```
"#]
pub struct SmfWriter<S> {
    sink: S,
    options: WriterOptions,
    tracks: u16,
}

impl<S: MidiSink> SmfWriter<S> {
    /// Write the header chunk and get ready for tracks.
    pub fn begin_file(mut sink: S, header: &Header, options: WriterOptions) -> WriteResult<Self> {
        sink.write_all(&chunk_prefix(HEADER_TAG, HEADER_LENGTH))?;
        sink.write_all(&header.to_bytes())?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "header: format {}, {} tracks, {:?}",
            header.format_raw(),
            header.track_count(),
            header.division()
        );
        Ok(Self {
            sink,
            options,
            tracks: 0,
        })
    }

    /// The options in use
    pub const fn options(&self) -> WriterOptions {
        self.options
    }

    /// How many tracks were completed
    pub const fn tracks_written(&self) -> u16 {
        self.tracks
    }

    /// Write one track chunk.
    ///
    /// `producer` emits the events; an end of track is appended unless it
    /// was the last thing emitted. The chunk length is filled in once the
    /// producer returns successfully.
    pub fn write_track<F, E>(&mut self, producer: F) -> Result<(), E>
    where
        F: FnOnce(&mut TrackWriter<'_, S>) -> Result<(), E>,
        E: From<WriteError>,
    {
        let start = self.sink.position()?;
        self.sink.write_all(&chunk_prefix(TRACK_TAG, 0))?;
        let mut track = TrackWriter {
            sink: &mut self.sink,
            options: self.options,
            written: 0,
            running_status: None,
            ended: false,
        };
        producer(&mut track)?;
        let length = track.finish()?;
        self.sink
            .write_at(&length.to_be_bytes(), start + (CHUNK_PREFIX_LENGTH as u64 - 4))?;
        self.tracks += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!("track {}: {length} bytes", self.tracks);
        Ok(())
    }

    /// Give back the sink
    pub fn into_inner(self) -> S {
        self.sink
    }
}

/// Emits the events of one track. Every emission starts with a delta time.
pub struct TrackWriter<'w, S> {
    sink: &'w mut S,
    options: WriterOptions,
    written: u64,
    running_status: Option<u8>,
    ended: bool,
}

impl<S: MidiSink> TrackWriter<'_, S> {
    fn put(&mut self, bytes: &[u8]) -> WriteResult<()> {
        self.sink.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    fn put_delta(&mut self, delta: u32) -> WriteResult<()> {
        if delta > MAX_VLQ {
            return Err(WriteError::ValueOutOfRange {
                what: "delta time",
                value: delta as u64,
            });
        }
        self.ended = false;
        self.put(&encode_vlq(delta))
    }

    fn put_len(&mut self, len: usize) -> WriteResult<()> {
        match u32::try_from(len) {
            Ok(len) if len <= MAX_VLQ => self.put(&encode_vlq(len)),
            _ => Err(WriteError::ValueOutOfRange {
                what: "payload length",
                value: len as u64,
            }),
        }
    }

    /// Bytes written in this track so far
    pub const fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Write a channel voice event.
    ///
    /// `status` is the upper nibble (`0x80` to `0xE0`), `channel` is 0 to 15.
    pub fn emit_channel_event(
        &mut self,
        delta: u32,
        status: u8,
        channel: u8,
        data: &[u8],
    ) -> WriteResult<()> {
        if !(0x80..=0xE0).contains(&status) || status & 0x0F != 0 {
            return Err(WriteError::ValueOutOfRange {
                what: "channel status",
                value: status as u64,
            });
        }
        if channel > 0x0F {
            return Err(WriteError::ChannelOutOfRange(channel));
        }
        if !(1..=2).contains(&data.len()) {
            return Err(WriteError::InvalidDataLength(data.len()));
        }
        if let Some(&byte) = data.iter().find(|b| **b > 0x7F) {
            return Err(WriteError::ValueOutOfRange {
                what: "data byte",
                value: byte as u64,
            });
        }
        self.put_delta(delta)?;
        let status = status | channel;
        if !(self.options.running_status && self.running_status == Some(status)) {
            self.put(&[status])?;
        }
        self.running_status = Some(status);
        self.put(data)
    }

    /// Write a meta event. Cancels running status.
    pub fn emit_meta_event(&mut self, delta: u32, kind: u8, data: &[u8]) -> WriteResult<()> {
        self.put_delta(delta)?;
        self.running_status = None;
        self.put(&[META_STATUS, kind])?;
        self.put_len(data.len())?;
        self.put(data)?;
        self.ended = kind == u8::from(MetaType::EndOfTrack);
        Ok(())
    }

    /// Write a system exclusive packet. Cancels running status.
    ///
    /// `data` starts with its lead byte, `0xF0` or `0xF7`, which is written
    /// before the length.
    pub fn emit_sysex_event(&mut self, delta: u32, data: &[u8]) -> WriteResult<()> {
        let Some((&lead, body)) = data.split_first() else {
            return Err(WriteError::EmptySysex);
        };
        self.put_delta(delta)?;
        self.running_status = None;
        self.put(&[lead])?;
        self.put_len(body.len())?;
        self.put(body)
    }

    /// Write an escape packet: `0xF7`, the length, then `data`.
    pub fn emit_escape_event(&mut self, delta: u32, data: &[u8]) -> WriteResult<()> {
        self.put_delta(delta)?;
        self.running_status = None;
        self.put(&[ESCAPE_STATUS])?;
        self.put_len(data.len())?;
        self.put(data)
    }

    /// Write a set tempo meta event, in microseconds per quarter note.
    pub fn emit_tempo(&mut self, delta: u32, tempo: u32) -> WriteResult<()> {
        if tempo > 0x00FF_FFFF {
            return Err(WriteError::ValueOutOfRange {
                what: "tempo",
                value: tempo as u64,
            });
        }
        self.emit_meta_event(delta, MetaType::Tempo.into(), &tempo.to_be_bytes()[1..])
    }

    /// Write a decoded event back, using its delta time.
    pub fn emit(&mut self, event: &TrackEvent<'_>) -> WriteResult<()> {
        let delta = event.delta();
        match event.message() {
            TrackMessage::Channel(c) => {
                let (data, len) = c.event().data();
                self.emit_channel_event(
                    delta,
                    c.event().kind().status(),
                    c.channel().index(),
                    &data[..len],
                )
            }
            TrackMessage::Meta(meta) => {
                let mut scratch = [0; 5];
                self.emit_meta_event(delta, meta.kind(), meta.payload(&mut scratch))
            }
            TrackMessage::SysEx(data) => self.emit_sysex_event(delta, data),
            TrackMessage::Escape(data) => self.emit_escape_event(delta, data),
        }
    }

    /// Append the end of track if needed and return the chunk length.
    fn finish(mut self) -> WriteResult<u32> {
        if !self.ended {
            self.emit_meta_event(0, MetaType::EndOfTrack.into(), &[])?;
        }
        u32::try_from(self.written).map_err(|_| WriteError::TrackTooLong(self.written))
    }
}
