use std::io::{self, Write};

use super::{EmitError, TextOptions, TimeMode};
use crate::{file::Header, prelude::*, reader::SmfSink};

/// Column at which a string or hex dump starts, for folding purposes.
const PAYLOAD_COLUMN: usize = 25;

#[doc = r#"
Renders decoded events as lines of text.

The emitter is an [`SmfSink`]: feed it to a [`SmfDecoder`].

# Example
```rust
# use smftext::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 0x3C, 0x40,
    0x60, 0x80, 0x3C, 0x00,
    0x00, 0xFF, 0x2F, 0x00,
];
let options = TextOptions { verbose: true, ..Default::default() };
let mut emitter = TextEmitter::new(Vec::new(), options);
decode(&bytes, &mut emitter).unwrap();
let text = String::from_utf8(emitter.into_inner()).unwrap();
assert_eq!(text.lines().nth(2), Some("0          On      ch=1   note=c5   vol=64 "));
```
"#]
pub struct TextEmitter<W> {
    out: W,
    options: TextOptions,
    time_mode: TimeMode,
    time: TimeModel,
    track: usize,
    named_sequence: bool,
}

impl<W: Write> TextEmitter<W> {
    /// Render into `out`
    pub fn new(out: W, options: TextOptions) -> Self {
        Self {
            out,
            options,
            time_mode: options.time_mode,
            time: TimeModel::new(96),
            track: 0,
            named_sequence: false,
        }
    }

    /// Give back the output
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_time(&mut self, event: &TrackEvent<'_>) -> io::Result<()> {
        let verbose = self.options.verbose;
        match self.time_mode {
            TimeMode::Absolute if verbose => write!(self.out, "{:<10} ", event.time()),
            TimeMode::Absolute => write!(self.out, "{} ", event.time()),
            TimeMode::Delta if verbose => write!(self.out, "{:<10} ", event.delta()),
            TimeMode::Delta => write!(self.out, "{} ", event.delta()),
            TimeMode::Musical | TimeMode::MusicalDelta => {
                let position = if self.time_mode == TimeMode::Musical {
                    self.time.position(event.time())
                } else {
                    self.time.span(event.time().saturating_sub(self.time.now()))
                };
                if verbose {
                    write!(self.out, "{position:#} ")
                } else {
                    write!(self.out, "{position} ")
                }
            }
        }
    }

    fn note(&self, note: Note) -> String {
        if self.options.names_notes() {
            note.to_string()
        } else {
            note.byte().to_string()
        }
    }

    fn write_channel(&mut self, event: &ChannelEvent) -> io::Result<()> {
        let ch = event.channel().number();
        let verbose = self.options.verbose;
        match *event.event() {
            VoiceEvent::NoteOn { note, velocity } | VoiceEvent::NoteOff { note, velocity } => {
                let label = if matches!(event.event(), VoiceEvent::NoteOn { .. }) {
                    "On"
                } else {
                    "Off"
                };
                let (note, v) = (self.note(note), velocity.value());
                if verbose {
                    writeln!(self.out, "{label:<8}ch={ch:<2}  note={note:<3}  vol={v:<3}")
                } else {
                    writeln!(self.out, "{label} ch={ch} n={note} v={v}")
                }
            }
            VoiceEvent::PolyPressure { note, pressure } => {
                let (note, v) = (self.note(note), pressure.value());
                if verbose {
                    writeln!(self.out, "PolyPr  ch={ch:<2}  note={note:<3}  val={v:<3}")
                } else {
                    writeln!(self.out, "PoPr ch={ch} n={note} v={v}")
                }
            }
            VoiceEvent::ControlChange { controller, value } => {
                let (c, v) = (controller.value(), value.value());
                if verbose {
                    writeln!(self.out, "Param   ch={ch:<2}  con={c:<3}   val={v:<3}")
                } else {
                    writeln!(self.out, "Par ch={ch} c={c} v={v}")
                }
            }
            VoiceEvent::PitchBend(v) => {
                if verbose {
                    writeln!(self.out, "Pb      ch={ch:<2}  val={v:<3}")
                } else {
                    writeln!(self.out, "Pb ch={ch} v={v}")
                }
            }
            VoiceEvent::ProgramChange { program } => {
                let p = program.value();
                if verbose {
                    writeln!(self.out, "ProgCh  ch={ch:<2}  prog={p:<3}")
                } else {
                    writeln!(self.out, "PrCh ch={ch} p={p}")
                }
            }
            VoiceEvent::ChannelPressure { pressure } => {
                let v = pressure.value();
                if verbose {
                    writeln!(self.out, "ChanPr  ch={ch:<2}  val={v:<3}")
                } else {
                    writeln!(self.out, "ChPr ch={ch} v={v}")
                }
            }
        }
    }

    /// A quoted string with escapes, folded if configured, and a line break.
    fn write_text(&mut self, text: &[u8]) -> io::Result<()> {
        let mut pos = PAYLOAD_COLUMN;
        self.out.write_all(b"\"")?;
        for &c in text {
            if self.options.fold.is_some_and(|fold| pos >= fold) {
                self.out.write_all(b"\\\n\t")?;
                // tab, \xab and the continuation backslash
                pos = 13;
                if c == b' ' || c == b'\t' {
                    self.out.write_all(b"\\")?;
                    pos += 1;
                }
            }
            match c {
                b'\\' | b'"' => {
                    self.out.write_all(&[b'\\', c])?;
                    pos += 2;
                }
                b'\r' => {
                    self.out.write_all(b"\\r")?;
                    pos += 2;
                }
                b'\n' => {
                    self.out.write_all(b"\\n")?;
                    pos += 2;
                }
                0 => {
                    self.out.write_all(b"\\0")?;
                    pos += 2;
                }
                c if c == b' ' || c.is_ascii_graphic() => {
                    self.out.write_all(&[c])?;
                    pos += 1;
                }
                c => {
                    write!(self.out, "\\x{c:02x}")?;
                    pos += 4;
                }
            }
        }
        self.out.write_all(b"\"\n")
    }

    /// Hex bytes each preceded by a space, folded if configured, and a line break.
    fn write_hex(&mut self, data: &[u8]) -> io::Result<()> {
        let mut pos = PAYLOAD_COLUMN;
        for &byte in data {
            match self.options.fold {
                Some(fold) if pos >= fold => {
                    write!(self.out, "\\\n\t{byte:02x}")?;
                    pos = 14;
                }
                _ => {
                    write!(self.out, " {byte:02x}")?;
                    pos += 3;
                }
            }
        }
        writeln!(self.out)
    }

    fn write_meta(&mut self, meta: &MetaEvent<'_>) -> io::Result<()> {
        match *meta {
            MetaEvent::SequenceNumber(n) => writeln!(self.out, "SeqNr {n}"),
            MetaEvent::Text { kind, text } => {
                let label = match kind {
                    TextKind::Text => "Text",
                    TextKind::Copyright => "Copyright",
                    TextKind::TrackName if self.track == 1 && !self.named_sequence => {
                        self.named_sequence = true;
                        "SeqName"
                    }
                    TextKind::TrackName => "TrkName",
                    TextKind::InstrumentName => "InstrName",
                    TextKind::Lyric => "Lyric",
                    TextKind::Marker => "Marker",
                    TextKind::CuePoint => "Cue",
                    TextKind::Unrecognized(0x08) => "Unrec",
                    TextKind::Unrecognized(other) => {
                        write!(self.out, "Meta 0x{other:02x} ")?;
                        return self.write_text(text);
                    }
                };
                write!(self.out, "Meta {label} ")?;
                self.write_text(text)
            }
            MetaEvent::EndOfTrack => writeln!(self.out, "Meta TrkEnd"),
            MetaEvent::Tempo(tempo) => writeln!(self.out, "Tempo {tempo}"),
            MetaEvent::SmpteOffset(o) => writeln!(
                self.out,
                "SMPTE {} {} {} {} {}",
                o.hour_byte, o.minute, o.second, o.frame, o.subframe
            ),
            MetaEvent::TimeSignature(sig) => {
                // a bogus power still prints, as a zero denominator
                let denominator = sig.denominator().unwrap_or(0);
                writeln!(
                    self.out,
                    "TimeSig {}/{} {} {}",
                    sig.numerator, denominator, sig.clocks_per_click, sig.thirty_seconds_per_quarter
                )?;
                self.time.set_time_signature(sig.numerator, denominator);
                Ok(())
            }
            MetaEvent::KeySignature(key) => writeln!(
                self.out,
                "KeySig {} {}",
                key.fifths,
                if key.minor { "minor" } else { "major" }
            ),
            MetaEvent::SequencerSpecific(data) => {
                write!(self.out, "SeqSpec")?;
                self.write_hex(data)
            }
            MetaEvent::Unknown { kind, data } => {
                write!(self.out, "Meta 0x{kind:02x}")?;
                self.write_hex(data)
            }
        }
    }
}

impl<W: Write> SmfSink for TextEmitter<W> {
    type Error = EmitError;

    fn on_header(&mut self, header: &Header) -> Result<(), EmitError> {
        let format = header.format_raw();
        if format > 2 {
            return Err(EmitError::UnsupportedFormat(format));
        }
        let ntrks = header.track_count();
        match header.division() {
            Division::TicksPerQuarterNote(tpqn) => {
                writeln!(self.out, "MFile {format} {ntrks} {tpqn}")?;
                self.time = TimeModel::new(*tpqn);
            }
            Division::Smpte(smpte) => {
                writeln!(
                    self.out,
                    "MFile {format} {ntrks} -{} {}",
                    smpte.frames_per_second, smpte.ticks_per_frame
                )?;
                // measures mean nothing without quarter notes
                match self.time_mode {
                    TimeMode::Musical => self.time_mode = TimeMode::Absolute,
                    TimeMode::MusicalDelta => self.time_mode = TimeMode::Delta,
                    _ => {}
                }
            }
        }
        self.track = 0;
        self.named_sequence = false;
        Ok(())
    }

    fn on_track_start(&mut self) -> Result<(), EmitError> {
        self.track += 1;
        self.time.rewind();
        writeln!(self.out, "MTrk")?;
        Ok(())
    }

    fn on_event(&mut self, event: &TrackEvent<'_>) -> Result<(), EmitError> {
        self.write_time(event)?;
        if self.time.advance_to(event.time()).is_none() {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                "event at {} is behind tick {}, keeping the clock",
                event.time(),
                self.time.now()
            );
        }
        match event.message() {
            TrackMessage::Channel(c) => self.write_channel(c)?,
            TrackMessage::Meta(meta) => self.write_meta(meta)?,
            TrackMessage::SysEx(data) => {
                write!(self.out, "SysEx")?;
                self.write_hex(data)?;
            }
            TrackMessage::Escape(data) => {
                write!(self.out, "Arb")?;
                self.write_hex(data)?;
            }
        }
        Ok(())
    }

    fn on_track_end(&mut self) -> Result<(), EmitError> {
        writeln!(self.out, "TrkEnd")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(options: TextOptions, header: Header, events: &[TrackEvent<'_>]) -> String {
        let mut emitter = TextEmitter::new(Vec::new(), options);
        emitter.on_header(&header).unwrap();
        emitter.on_track_start().unwrap();
        for event in events {
            emitter.on_event(event).unwrap();
        }
        emitter.on_track_end().unwrap();
        String::from_utf8(emitter.into_inner()).unwrap()
    }

    fn tpqn(ticks: u16) -> Header {
        Header::new(1, 1, Division::TicksPerQuarterNote(ticks))
    }

    fn channel(status: u8, data: [u8; 2]) -> TrackMessage<'static> {
        TrackMessage::Channel(ChannelEvent::from_status(status, data).unwrap().unwrap())
    }

    #[test]
    fn compact_channel_lines() {
        let events = [
            TrackEvent::new(0, 0, channel(0x91, [61, 90])),
            TrackEvent::new(10, 10, channel(0xA1, [61, 20])),
            TrackEvent::new(0, 10, channel(0xB9, [7, 100])),
            TrackEvent::new(0, 10, channel(0xE0, [0, 0x40])),
            TrackEvent::new(0, 10, channel(0xC0, [5, 0])),
            TrackEvent::new(5, 15, channel(0xD0, [33, 0])),
        ];
        let options = TextOptions {
            note_names: true,
            ..Default::default()
        };
        assert_eq!(
            render(options, tpqn(96), &events),
            "MFile 1 1 96\nMTrk\n\
             0 On ch=2 n=c#5 v=90\n\
             10 PoPr ch=2 n=c#5 v=20\n\
             10 Par ch=10 c=7 v=100\n\
             10 Pb ch=1 v=8192\n\
             10 PrCh ch=1 p=5\n\
             15 ChPr ch=1 v=33\n\
             TrkEnd\n"
        );
    }

    #[test]
    fn verbose_columns() {
        let events = [
            TrackEvent::new(0, 0, channel(0xB0, [7, 100])),
            TrackEvent::new(0, 0, channel(0xC0, [5, 0])),
        ];
        let options = TextOptions {
            verbose: true,
            time_mode: TimeMode::Musical,
            ..Default::default()
        };
        let text = render(options, tpqn(96), &events);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[2], "000:00:000 Param   ch=1   con=7     val=100");
        assert_eq!(lines[3], "000:00:000 ProgCh  ch=1   prog=5  ");
    }

    #[test]
    fn metas_and_first_sequence_name() {
        let events = [
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x03, b"Song"))),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x03, b"Lead"))),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x0A, b"x"))),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x01, b"say \"hi\"\n\x01"))),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x59, &[0xFE, 1]))),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x58, &[6, 3, 24, 8]))),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x54, &[0x60, 1, 2, 3, 4]))),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x7F, &[0, 0x20]))),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x51, &[1, 2]))),
            TrackEvent::new(0, 0, TrackMessage::SysEx(&[0xF0, 0x7E, 0xF7])),
            TrackEvent::new(0, 0, TrackMessage::Escape(&[0xF3, 0x01])),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::EndOfTrack)),
        ];
        assert_eq!(
            render(TextOptions::default(), tpqn(96), &events),
            "MFile 1 1 96\nMTrk\n\
             0 Meta SeqName \"Song\"\n\
             0 Meta TrkName \"Lead\"\n\
             0 Meta 0x0a \"x\"\n\
             0 Meta Text \"say \\\"hi\\\"\\n\\x01\"\n\
             0 KeySig -2 minor\n\
             0 TimeSig 6/8 24 8\n\
             0 SMPTE 96 1 2 3 4\n\
             0 SeqSpec 00 20\n\
             0 Meta 0x51 01 02\n\
             0 SysEx f0 7e f7\n\
             0 Arb f3 01\n\
             0 Meta TrkEnd\n\
             TrkEnd\n"
        );
    }

    #[test]
    fn musical_time_follows_signatures() {
        let events = [
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x58, &[4, 2, 24, 8]))),
            TrackEvent::new(768, 768, TrackMessage::Meta(MetaEvent::parse(0x58, &[3, 2, 24, 8]))),
            TrackEvent::new(96, 864, channel(0x90, [60, 1])),
            TrackEvent::new(192, 1056, channel(0x80, [60, 0])),
        ];
        let options = TextOptions {
            time_mode: TimeMode::Musical,
            ..Default::default()
        };
        let text = render(options, tpqn(96), &events);
        let times: Vec<_> = text
            .lines()
            .skip(2)
            .filter_map(|l| l.split(' ').next())
            .collect();
        assert_eq!(times, ["0:0:0", "2:0:0", "2:1:0", "3:0:0", "TrkEnd"]);
    }

    #[test]
    fn musical_deltas_measure_the_gap() {
        let events = [
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x58, &[3, 2, 24, 8]))),
            TrackEvent::new(298, 298, channel(0x90, [60, 1])),
            TrackEvent::new(48, 346, channel(0x80, [60, 0])),
            TrackEvent::new(0, 346, TrackMessage::Meta(MetaEvent::parse(0x58, &[6, 3, 24, 8]))),
            TrackEvent::new(97, 443, TrackMessage::Meta(MetaEvent::EndOfTrack)),
        ];
        let options = TextOptions {
            time_mode: TimeMode::MusicalDelta,
            ..Default::default()
        };
        let text = render(options, tpqn(96), &events);
        let times: Vec<_> = text
            .lines()
            .skip(2)
            .filter_map(|l| l.split(' ').next())
            .collect();
        assert_eq!(times, ["0:0:0", "1:0:10", "0:0:48", "0:0:0", "0:2:1", "TrkEnd"]);

        let options = TextOptions {
            verbose: true,
            time_mode: TimeMode::MusicalDelta,
            ..Default::default()
        };
        let text = render(options, tpqn(96), &events[..2]);
        assert!(text.contains("\n001:00:010 On      ch=1"), "{text}");
    }

    #[test]
    fn folding() {
        let options = TextOptions {
            fold: Some(31),
            ..Default::default()
        };
        let events = [
            TrackEvent::new(0, 0, TrackMessage::SysEx(&[0xF0, 1, 2, 3, 0xF7])),
            TrackEvent::new(0, 0, TrackMessage::Meta(MetaEvent::parse(0x01, b"abcdef gh"))),
        ];
        let text = render(options, tpqn(96), &events);
        assert_eq!(
            text,
            "MFile 1 1 96\nMTrk\n\
             0 SysEx f0 01\\\n\t02 03 f7\n\
             0 Meta Text \"abcdef\\\n\t\\ gh\"\n\
             TrkEnd\n"
        );
    }

    #[test]
    fn smpte_header_and_bad_format() {
        let division = Division::from_raw(0xE728);
        let text = render(
            TextOptions {
                time_mode: TimeMode::Musical,
                ..Default::default()
            },
            Header::new(0, 1, division),
            &[TrackEvent::new(7, 7, channel(0x90, [1, 1]))],
        );
        assert_eq!(text, "MFile 0 1 -25 40\nMTrk\n7 On ch=1 n=1 v=1\nTrkEnd\n");

        let text = render(
            TextOptions {
                time_mode: TimeMode::MusicalDelta,
                ..Default::default()
            },
            Header::new(0, 1, division),
            &[TrackEvent::new(7, 7, channel(0x90, [1, 1]))],
        );
        assert_eq!(text, "MFile 0 1 -25 40\nMTrk\n7 On ch=1 n=1 v=1\nTrkEnd\n");

        let mut emitter = TextEmitter::new(Vec::new(), TextOptions::default());
        let err = emitter
            .on_header(&Header::new(3, 1, Division::TicksPerQuarterNote(96)))
            .unwrap_err();
        assert!(matches!(err, EmitError::UnsupportedFormat(3)));
    }
}
