use pretty_assertions::assert_eq;
use smftext::{file::Header, prelude::*};

/// An event with its payload copied out of the decoder's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Owned {
    Channel(ChannelEvent),
    Meta(u8, Vec<u8>),
    SysEx(Vec<u8>),
    Escape(Vec<u8>),
}

#[derive(Default)]
struct Collect {
    header: Option<Header>,
    tracks: Vec<Vec<(u32, u64, Owned)>>,
}

impl SmfSink for Collect {
    type Error = std::convert::Infallible;

    fn on_header(&mut self, header: &Header) -> Result<(), Self::Error> {
        self.header = Some(*header);
        Ok(())
    }

    fn on_track_start(&mut self) -> Result<(), Self::Error> {
        self.tracks.push(Vec::new());
        Ok(())
    }

    fn on_event(&mut self, event: &TrackEvent<'_>) -> Result<(), Self::Error> {
        let owned = match event.message() {
            TrackMessage::Channel(c) => Owned::Channel(*c),
            TrackMessage::Meta(m) => {
                let mut scratch = [0; 5];
                Owned::Meta(m.kind(), m.payload(&mut scratch).to_vec())
            }
            TrackMessage::SysEx(d) => Owned::SysEx(d.to_vec()),
            TrackMessage::Escape(d) => Owned::Escape(d.to_vec()),
        };
        if let Some(track) = self.tracks.last_mut() {
            track.push((event.delta(), event.time(), owned));
        }
        Ok(())
    }
}

fn collect(bytes: &[u8]) -> Collect {
    let mut sink = Collect::default();
    decode(bytes, &mut sink).unwrap();
    sink
}

fn rewrite(collected: &Collect, options: WriterOptions) -> Vec<u8> {
    let header = collected.header.unwrap();
    let mut writer = SmfWriter::begin_file(Vec::new(), &header, options).unwrap();
    for track in &collected.tracks {
        writer
            .write_track(|w| {
                for (delta, _, event) in track {
                    match event {
                        Owned::Channel(c) => {
                            let (data, len) = c.event().data();
                            w.emit_channel_event(
                                *delta,
                                c.event().kind().status(),
                                c.channel().index(),
                                &data[..len],
                            )?
                        }
                        Owned::Meta(kind, data) => w.emit_meta_event(*delta, *kind, data)?,
                        Owned::SysEx(data) => w.emit_sysex_event(*delta, data)?,
                        Owned::Escape(data) => w.emit_escape_event(*delta, data)?,
                    }
                }
                Ok::<_, WriteError>(())
            })
            .unwrap();
    }
    writer.into_inner()
}

#[test]
fn tempo_track_and_note_track() {
    let header = Header::new(1, 2, Division::TicksPerQuarterNote(96));
    let mut writer = SmfWriter::begin_file(Vec::new(), &header, WriterOptions::default()).unwrap();
    writer
        .write_track(|track| track.emit_tempo(0, 500_000))
        .unwrap();
    writer
        .write_track(|track| {
            track.emit_channel_event(0, 0x90, 0, &[60, 100])?;
            track.emit_channel_event(96, 0x80, 0, &[60, 0])
        })
        .unwrap();
    assert_eq!(writer.tracks_written(), 2);
    let bytes = writer.into_inner();

    // every declared track length matches the bytes that follow it
    let first_len = u32::from_be_bytes(bytes[18..22].try_into().unwrap()) as usize;
    assert_eq!(first_len, 11);
    let second = 22 + first_len;
    assert_eq!(&bytes[second..second + 4], b"MTrk");
    let second_len = u32::from_be_bytes(bytes[second + 4..second + 8].try_into().unwrap()) as usize;
    assert_eq!(bytes.len(), second + 8 + second_len);

    let collected = collect(&bytes);
    assert_eq!(collected.header, Some(header));
    assert_eq!(
        collected.tracks[0],
        [
            (0, 0, Owned::Meta(0x51, vec![0x07, 0xA1, 0x20])),
            (0, 0, Owned::Meta(0x2F, vec![])),
        ]
    );
    let on = ChannelEvent::from_status(0x90, [60, 100]).unwrap().unwrap();
    let off = ChannelEvent::from_status(0x80, [60, 0]).unwrap().unwrap();
    assert_eq!(
        collected.tracks[1],
        [
            (0, 0, Owned::Channel(on)),
            (96, 96, Owned::Channel(off)),
            (0, 96, Owned::Meta(0x2F, vec![])),
        ]
    );
}

#[test]
fn decoded_events_rewrite_identically() {
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0x01, 0xE0, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 37, //
        0x00, 0xFF, 0x03, 0x03, b'a', b'b', b'c', //
        0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7, //
        0x00, 0xF7, 0x02, 0xF3, 0x01, //
        0x00, 0xC3, 0x05, //
        0x81, 0x00, 0xB3, 0x07, 0x64, //
        0x00, 0xE3, 0x00, 0x40, //
        0x00, 0xD3, 0x10, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let collected = collect(&bytes);
    assert_eq!(collected.tracks[0].len(), 8);
    assert_eq!(rewrite(&collected, WriterOptions::default()), bytes);
}

#[test]
fn running_status_is_written_when_asked() {
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 14, //
        0x00, 0x90, 60, 100, //
        0x10, 60, 0, //
        0x00, 62, 100, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let collected = collect(&bytes);
    let with_status = rewrite(&collected, WriterOptions::default());
    assert_eq!(with_status.len(), bytes.len() + 2);
    let compact = rewrite(
        &collected,
        WriterOptions {
            running_status: true,
        },
    );
    assert_eq!(compact, bytes);
}
