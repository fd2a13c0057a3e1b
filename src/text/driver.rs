use core::{fmt, ops::RangeInclusive};

use super::{DriverOptions, Keyword, TextError, TextResult, Token, TokenStream};
use crate::{
    file::{Header, SmpteDivision},
    prelude::*,
    vlq::MAX_VLQ,
    writer::{MidiSink, SmfWriter, TrackWriter},
};

/// A line that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// Line number, from 1
    pub line: usize,
    /// What was wrong
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.line, self.message)
    }
}

/// Compile the text format into a Standard MIDI File written to `sink`.
///
/// Lines with bad arguments inside a track are skipped and reported in the
/// returned diagnostics. A missing header or track start, and the end of the
/// input inside a track, stop the compilation.
pub fn compile<T: TokenStream, S: MidiSink>(
    tokens: &mut T,
    sink: S,
    options: DriverOptions,
) -> TextResult<Vec<Diagnostic>> {
    TextDriver::new(tokens, options).compile(sink)
}

/// One line's worth of output for the writer.
enum Emit {
    Channel {
        status: u8,
        channel: u8,
        data: [u8; 2],
        len: usize,
    },
    Meta {
        kind: u8,
        data: Vec<u8>,
    },
    SysEx(Vec<u8>),
    Escape(Vec<u8>),
    Tempo(u32),
    TimeSignature {
        numerator: u8,
        denominator: u32,
        data: [u8; 4],
    },
}

/// Reads tokens line by line and drives an [`SmfWriter`].
pub struct TextDriver<'t, T> {
    tokens: &'t mut T,
    options: DriverOptions,
    time: TimeModel,
    diagnostics: Vec<Diagnostic>,
    eol_seen: bool,
}

impl<'t, T: TokenStream> TextDriver<'t, T> {
    /// A driver reading from `tokens`
    pub fn new(tokens: &'t mut T, options: DriverOptions) -> Self {
        Self {
            tokens,
            options,
            time: TimeModel::new(96),
            diagnostics: Vec::new(),
            eol_seen: true,
        }
    }

    /// Compile the header and every track it announces.
    pub fn compile<S: MidiSink>(mut self, sink: S) -> TextResult<Vec<Diagnostic>> {
        let header = self.header()?;
        let mut writer = SmfWriter::begin_file(sink, &header, self.options.writer)?;
        for _ in 0..header.track_count() {
            self.track_start()?;
            writer.write_track(|track| self.track_body(track))?;
        }
        if !matches!(self.next_line_start(), Token::Eof) {
            self.diagnostic("garbage at end of input".to_string());
        }
        Ok(self.diagnostics)
    }

    fn next(&mut self) -> Token {
        let token = self.tokens.next_token();
        self.eol_seen = token == Token::Eol;
        token
    }

    /// The first token that is not an empty line
    fn next_line_start(&mut self) -> Token {
        loop {
            match self.next() {
                Token::Eol => continue,
                token => return token,
            }
        }
    }

    fn line(&self) -> usize {
        self.tokens.line()
    }

    fn syntax(&self, message: impl Into<String>) -> TextError {
        TextError::Syntax {
            line: self.line(),
            message: message.into(),
        }
    }

    fn invalid(&self, message: impl Into<String>) -> TextError {
        TextError::Validation {
            line: self.line(),
            message: message.into(),
        }
    }

    fn diagnostic(&mut self, message: String) {
        let line = self.line();
        #[cfg(feature = "tracing")]
        tracing::warn!(line, "{message}");
        self.diagnostics.push(Diagnostic { line, message });
    }

    fn skip_line(&mut self) {
        while !self.eol_seen {
            if self.next() == Token::Eof {
                break;
            }
        }
    }

    /// Report anything left on the line.
    fn end_of_line(&mut self) {
        if self.eol_seen {
            return;
        }
        match self.next() {
            Token::Eol | Token::Eof => {}
            _ => {
                self.diagnostic("garbage deleted".to_string());
                self.skip_line();
            }
        }
    }

    fn recover(&mut self, error: TextError) {
        let message = match error {
            TextError::Validation { message, .. } | TextError::Syntax { message, .. } => message,
            other => other.to_string(),
        };
        self.diagnostic(message);
        self.skip_line();
    }

    fn header(&mut self) -> TextResult<Header> {
        if self.next_line_start() != Token::Keyword(Keyword::MFile) {
            return Err(TextError::MissingHeader);
        }
        let format = self.int("MFile format")?;
        let format = self.check(format, "MFile format", 0..=0xFFFF)?;
        let ntrks = self.int("MFile #tracks")?;
        let ntrks = self.check(ntrks, "MFile #tracks", 0..=0xFFFF)?;
        let clicks = self.int("MFile Clicks")?;
        let division = if clicks < 0 {
            let fps = self.check(-clicks, "SMPTE frames per second", 1..=127)?;
            let tpf = self.int("MFile SMPTE division")?;
            let tpf = self.check(tpf, "SMPTE ticks per frame", 0..=255)?;
            Division::Smpte(SmpteDivision {
                frames_per_second: fps as u8,
                ticks_per_frame: tpf as u8,
            })
        } else {
            Division::TicksPerQuarterNote(self.check(clicks, "MFile Clicks", 1..=0x7FFF)? as u16)
        };
        self.end_of_line();
        self.time = TimeModel::new(u16::try_from(division.beat_ticks()).unwrap_or(u16::MAX));
        Ok(Header::new(format as u16, ntrks as u16, division))
    }

    fn track_start(&mut self) -> TextResult<()> {
        if self.next_line_start() != Token::Keyword(Keyword::MTrk) {
            return Err(TextError::MissingTrackStart { line: self.line() });
        }
        self.end_of_line();
        self.time.rewind();
        Ok(())
    }

    fn track_body<S: MidiSink>(&mut self, track: &mut TrackWriter<'_, S>) -> TextResult<()> {
        loop {
            let result = match self.next() {
                Token::Eof => return Err(TextError::UnterminatedTrack { line: self.line() }),
                Token::Eol => continue,
                Token::Keyword(Keyword::TrkEnd) => {
                    self.end_of_line();
                    #[cfg(feature = "tracing")]
                    tracing::debug!("track compiled, {} bytes", track.bytes_written());
                    return Ok(());
                }
                Token::Keyword(Keyword::MTrk) => Err(self.syntax("unexpected MTrk")),
                Token::Int(time) => self.event_line(time, track),
                other => Err(self.syntax(format!("unknown input {other}"))),
            };
            match result {
                Ok(()) => self.end_of_line(),
                Err(e) if e.is_recoverable() => self.recover(e),
                Err(e) => return Err(e),
            }
        }
    }

    fn event_line<S: MidiSink>(
        &mut self,
        first: i64,
        track: &mut TrackWriter<'_, S>,
    ) -> TextResult<()> {
        let illegal_time = "illegal time value";
        let mut token = self.next();
        let (time, delta) = if token == Token::Slash {
            let beat = self.int("beat")?;
            if self.next() != Token::Slash {
                return Err(self.syntax(illegal_time));
            }
            let tick = self.int("tick")?;
            token = self.next();
            let position = match (u64::try_from(first), u64::try_from(beat), u64::try_from(tick)) {
                (Ok(measure), Ok(beat), Ok(tick)) => MusicalTime {
                    measure,
                    beat,
                    tick,
                },
                _ => return Err(self.invalid(illegal_time)),
            };
            if self.options.delta_times {
                let now = self.time.now();
                let time = self
                    .time
                    .span_ticks(position)
                    .and_then(|span| span.checked_add(now))
                    .ok_or_else(|| self.invalid(illegal_time))?;
                (time, Some(time - now))
            } else {
                let time = self
                    .time
                    .to_ticks(position)
                    .ok_or_else(|| self.invalid(illegal_time))?;
                (time, time.checked_sub(self.time.now()))
            }
        } else if self.options.delta_times {
            let delta = u64::try_from(first).ok();
            (self.time.now().saturating_add(delta.unwrap_or(0)), delta)
        } else {
            let time = u64::try_from(first).map_err(|_| self.invalid(illegal_time))?;
            (time, time.checked_sub(self.time.now()))
        };
        let Some(delta) = delta else {
            return Err(self.invalid("illegal time value, did you forget delta times?"));
        };
        let delta = u32::try_from(delta)
            .ok()
            .filter(|d| *d <= MAX_VLQ)
            .ok_or_else(|| self.invalid(format!("delta time {delta} too large")))?;

        let emit = self.event(token)?;
        match &emit {
            Emit::Channel {
                status,
                channel,
                data,
                len,
            } => track.emit_channel_event(delta, *status, *channel, &data[..*len])?,
            Emit::Meta { kind, data } => track.emit_meta_event(delta, *kind, data)?,
            Emit::SysEx(data) => track.emit_sysex_event(delta, data)?,
            Emit::Escape(data) => track.emit_escape_event(delta, data)?,
            Emit::Tempo(tempo) => track.emit_tempo(delta, *tempo)?,
            Emit::TimeSignature { data, .. } => {
                track.emit_meta_event(delta, MetaType::TimeSignature.into(), data)?
            }
        }
        // time is never behind now, or the line was rejected above
        let advanced = self.time.advance_to(time);
        debug_assert_eq!(advanced, Some(delta as u64));
        if let Emit::TimeSignature {
            numerator,
            denominator,
            ..
        } = emit
        {
            self.time.set_time_signature(numerator, denominator);
        }
        Ok(())
    }

    fn event(&mut self, token: Token) -> TextResult<Emit> {
        let Token::Keyword(keyword) = token else {
            return Err(self.syntax(format!("unknown input {token}")));
        };
        Ok(match keyword {
            Keyword::On | Keyword::Off | Keyword::PolyPr => {
                let channel = self.channel()?;
                let note = self.note()?;
                let value = self.field(Keyword::Val, "Value", 0..=127)? as u8;
                let status = match keyword {
                    Keyword::On => 0x90,
                    Keyword::Off => 0x80,
                    _ => 0xA0,
                };
                Emit::Channel {
                    status,
                    channel,
                    data: [note, value],
                    len: 2,
                }
            }
            Keyword::Param => {
                let channel = self.channel()?;
                let controller = self.field(Keyword::Con, "Controller", 0..=127)? as u8;
                let value = self.field(Keyword::Val, "Value", 0..=127)? as u8;
                Emit::Channel {
                    status: 0xB0,
                    channel,
                    data: [controller, value],
                    len: 2,
                }
            }
            Keyword::PitchBend => {
                let channel = self.channel()?;
                let value = self.field(Keyword::Val, "Value", 0..=16383)?;
                Emit::Channel {
                    status: 0xE0,
                    channel,
                    data: [(value % 128) as u8, (value / 128) as u8],
                    len: 2,
                }
            }
            Keyword::ProgCh => {
                let channel = self.channel()?;
                let program = self.field(Keyword::Prog, "Program number", 0..=127)? as u8;
                Emit::Channel {
                    status: 0xC0,
                    channel,
                    data: [program, 0],
                    len: 1,
                }
            }
            Keyword::ChanPr => {
                let channel = self.channel()?;
                let value = self.field(Keyword::Val, "Value", 0..=127)? as u8;
                Emit::Channel {
                    status: 0xD0,
                    channel,
                    data: [value, 0],
                    len: 1,
                }
            }
            Keyword::SysEx => {
                let data = self.payload()?;
                if !matches!(data.first(), Some(&(SYSEX_STATUS | ESCAPE_STATUS))) {
                    return Err(self.invalid("SysEx data must start with f0 or f7"));
                }
                Emit::SysEx(data)
            }
            Keyword::Arb => Emit::Escape(self.payload()?),
            Keyword::Tempo => {
                let tempo = self.int("Tempo")?;
                Emit::Tempo(self.check(tempo, "Tempo", 0..=0xFF_FFFF)? as u32)
            }
            Keyword::TimeSig => {
                let numerator = self.int("TimeSig")?;
                if self.next() != Token::Slash {
                    return Err(self.syntax("TimeSig expects numerator/denominator"));
                }
                let numerator = self.check(numerator, "TimeSig numerator", 1..=255)? as u8;
                let denominator = self.byte("Denom")?;
                let clocks = self.byte("clocks per click")?;
                let thirty_seconds = self.byte("32nd notes per 24 clocks")?;
                if !denominator.is_power_of_two() {
                    return Err(self.invalid("illegal TimeSig"));
                }
                Emit::TimeSignature {
                    numerator,
                    denominator: denominator as u32,
                    data: [
                        numerator,
                        denominator.trailing_zeros() as u8,
                        clocks,
                        thirty_seconds,
                    ],
                }
            }
            Keyword::Smpte => {
                let mut data = vec![0; 5];
                for byte in data.iter_mut() {
                    *byte = self.byte("SMPTE")?;
                }
                Emit::Meta {
                    kind: MetaType::SmpteOffset.into(),
                    data,
                }
            }
            Keyword::KeySig => {
                let fifths = self.int("KeySig")?;
                let fifths = match self.check(fifths, "Key Sig", -7..=7) {
                    Ok(f) => f as i8,
                    Err(_) => return Err(self.invalid("Key Sig must be between -7 and 7")),
                };
                let minor = match self.next() {
                    Token::Keyword(Keyword::Minor) => true,
                    Token::Keyword(Keyword::Major) => false,
                    _ => return Err(self.syntax("KeySig expects major or minor")),
                };
                Emit::Meta {
                    kind: MetaType::KeySignature.into(),
                    data: KeySignature { fifths, minor }.to_bytes().to_vec(),
                }
            }
            Keyword::SeqNr => {
                let mut token = self.next();
                if token == Token::Keyword(Keyword::Val) {
                    token = self.next();
                }
                let Token::Int(number) = token else {
                    return Err(self.syntax("integer expected for SeqNr"));
                };
                let number = self.check(number, "SeqNr", 0..=0xFFFF)? as u16;
                Emit::Meta {
                    kind: MetaType::SequenceNumber.into(),
                    data: number.to_be_bytes().to_vec(),
                }
            }
            Keyword::Meta => {
                let kind = match self.next() {
                    Token::Keyword(Keyword::TrkEnd) => {
                        return Ok(Emit::Meta {
                            kind: MetaType::EndOfTrack.into(),
                            data: Vec::new(),
                        });
                    }
                    Token::Keyword(k) => k
                        .text_kind()
                        .ok_or_else(|| self.syntax(format!("illegal Meta type {k:?}")))?,
                    Token::Int(kind) => self.check(kind, "Meta type", 0..=0xFF)? as u8,
                    other => return Err(self.syntax(format!("illegal Meta type {other}"))),
                };
                Emit::Meta {
                    kind,
                    data: self.payload()?,
                }
            }
            Keyword::SeqSpec => Emit::Meta {
                kind: MetaType::SequencerSpecific.into(),
                data: self.payload()?,
            },
            other => return Err(self.syntax(format!("unknown input {other:?}"))),
        })
    }

    fn int(&mut self, what: &str) -> TextResult<i64> {
        match self.next() {
            Token::Int(v) => Ok(v),
            _ => Err(self.syntax(format!("integer expected for {what}"))),
        }
    }

    fn check(&self, value: i64, what: &str, range: RangeInclusive<i64>) -> TextResult<i64> {
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(self.invalid(format!(
                "{what} must be between {} and {}, not {value}",
                range.start(),
                range.end()
            )))
        }
    }

    fn byte(&mut self, what: &str) -> TextResult<u8> {
        let value = self.int(what)?;
        Ok(self.check(value, what, 0..=127)? as u8)
    }

    /// `<keyword> <int>` with the int in `range`
    fn field(&mut self, keyword: Keyword, what: &str, range: RangeInclusive<i64>) -> TextResult<i64> {
        if self.next() != Token::Keyword(keyword) {
            return Err(self.syntax(format!("{keyword:?} field expected")));
        }
        let value = self.int(what)?;
        self.check(value, what, range)
    }

    fn channel(&mut self) -> TextResult<u8> {
        Ok(self.field(Keyword::Ch, "Chan", 1..=16)? as u8 - 1)
    }

    fn note(&mut self) -> TextResult<u8> {
        if self.next() != Token::Keyword(Keyword::Note) {
            return Err(self.syntax("Note field expected"));
        }
        match self.next() {
            Token::Int(v) => Ok(self.check(v, "Note", 0..=127)? as u8),
            Token::Note(name) => name
                .parse::<Note>()
                .map(|note| note.byte())
                .map_err(|e| self.invalid(e.to_string())),
            _ => Err(self.syntax("note number or name expected")),
        }
    }

    /// A quoted string or a run of hex bytes up to the end of the line.
    fn payload(&mut self) -> TextResult<Vec<u8>> {
        self.tokens.set_hex_mode(true);
        let mut token = match self.next() {
            Token::Str(raw) => return unescape(&raw).map_err(|e| self.invalid(e)),
            Token::Eol | Token::Eof => return Ok(Vec::new()),
            token @ Token::Int(_) => token,
            _ => return Err(self.syntax("string or hex input expected")),
        };
        let mut data = Vec::new();
        while let Token::Int(v) = token {
            let byte =
                u8::try_from(v).map_err(|_| self.invalid(format!("hex value {v:x} is not a byte")))?;
            data.push(byte);
            token = self.next();
        }
        match token {
            Token::Eol | Token::Eof => Ok(data),
            _ => Err(self.syntax("unknown hex input")),
        }
    }
}

/// Decode the escapes of a quoted string.
///
/// `\0 \n \r \t \xNN` are control bytes, a backslash before a line break
/// drops the break and the blanks after it, any other escaped byte stands for
/// itself.
pub fn unescape(raw: &[u8]) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied().peekable();
    while let Some(c) = bytes.next() {
        if c != b'\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = bytes.next() else {
            out.push(c);
            break;
        };
        match escaped {
            b'0' => out.push(0),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'x' => {
                let digits = [bytes.next(), bytes.next()];
                let value = match digits {
                    [Some(hi), Some(lo)] => core::str::from_utf8(&[hi, lo])
                        .ok()
                        .and_then(|s| u8::from_str_radix(s, 16).ok()),
                    _ => None,
                };
                out.push(value.ok_or_else(|| "illegal \\x in string".to_string())?);
            }
            b'\r' | b'\n' => {
                while bytes.next_if(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n')).is_some() {}
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Lexer;
    use pretty_assertions::assert_eq;

    fn compile_str(text: &str, options: DriverOptions) -> TextResult<(Vec<u8>, Vec<Diagnostic>)> {
        let mut out = Vec::new();
        let diagnostics = compile(&mut Lexer::new(text), &mut out, options)?;
        Ok((out, diagnostics))
    }

    fn track_of(bytes: &[u8]) -> &[u8] {
        &bytes[22..]
    }

    #[test]
    fn unescapes() {
        assert_eq!(unescape(b"a\\\"b\\\\").unwrap(), b"a\"b\\");
        assert_eq!(unescape(b"\\0\\n\\r\\t\\x7f").unwrap(), [0, b'\n', b'\r', b'\t', 0x7F]);
        assert_eq!(unescape(b"ab\\\n\t\\ cd").unwrap(), b"ab cd");
        assert!(unescape(b"\\xZZ").is_err());
    }

    #[test]
    fn channel_events() {
        let text = "MFile 0 1 96\nMTrk\n\
                    0 On ch=1 n=c5 v=100\n\
                    0 PoPr ch=2 n=61 v=5\n\
                    10 Par ch=16 c=7 v=127\n\
                    10 Pb ch=1 v=8192\n\
                    20 PrCh ch=1 p=3\n\
                    20 ChPr ch=1 v=9\n\
                    TrkEnd\n";
        let (bytes, diagnostics) = compile_str(text, DriverOptions::default()).unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(
            track_of(&bytes),
            [
                0x00, 0x90, 60, 100, //
                0x00, 0xA1, 61, 5, //
                0x0A, 0xBF, 7, 127, //
                0x00, 0xE0, 0x00, 0x40, //
                0x0A, 0xC0, 3, //
                0x00, 0xD0, 9, //
                0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn bad_lines_are_skipped() {
        let text = "MFile 0 1 96\nMTrk\n\
                    0 On ch=17 n=60 v=1\n\
                    5 On ch=1 n=60 v=1 extra\n\
                    5 TimeSig 3/5 24 8\n\
                    6 KeySig 8 major\n\
                    7 On ch=1 note 60\n\
                    3 Off ch=1 n=60 v=0\n\
                    9 Off ch=1 n=60 v=0\n\
                    TrkEnd\n";
        let (bytes, diagnostics) = compile_str(text, DriverOptions::default()).unwrap();
        let lines: Vec<_> = diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, [3, 4, 5, 6, 7, 8]);
        assert_eq!(diagnostics[1].message, "garbage deleted");
        assert_eq!(
            track_of(&bytes),
            [0x05, 0x90, 60, 1, 0x04, 0x80, 60, 0, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn musical_and_delta_times() {
        let text = "MFile 0 1 96\nMTrk\n\
                    0/0/0 TimeSig 3/4 24 8\n\
                    1:0:0 On ch=1 n=60 v=1\n\
                    1:2:10 Off ch=1 n=60 v=0\n\
                    TrkEnd\n";
        let (bytes, _) = compile_str(text, DriverOptions::default()).unwrap();
        assert_eq!(
            &track_of(&bytes)[8..],
            [0x82, 0x20, 0x90, 60, 1, 0x81, 0x4A, 0x80, 60, 0, 0x00, 0xFF, 0x2F, 0x00]
        );

        let text = "MFile 0 1 96\nMTrk\n0 On ch=1 n=60 v=1\n96 Off ch=1 n=60 v=0\nTrkEnd\n";
        let options = DriverOptions {
            delta_times: true,
            ..Default::default()
        };
        let (bytes, _) = compile_str(text, options).unwrap();
        assert_eq!(track_of(&bytes)[4], 0x60);
    }

    #[test]
    fn musical_delta_times() {
        let text = "MFile 0 1 96\nMTrk\n\
                    0:0:0 TimeSig 3/4 24 8\n\
                    1:0:10 On ch=1 n=60 v=1\n\
                    0/0/48 Off ch=1 n=60 v=0\n\
                    TrkEnd\n";
        let options = DriverOptions {
            delta_times: true,
            ..Default::default()
        };
        let (bytes, diagnostics) = compile_str(text, options).unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(
            &track_of(&bytes)[8..],
            [0x82, 0x2A, 0x90, 60, 1, 0x30, 0x80, 60, 0, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn huge_octave_is_skipped() {
        let text = "MFile 0 1 96\nMTrk\n\
                    0 On ch=1 n=c999999999 v=1\n\
                    0 On ch=1 n=c4 v=1\n\
                    TrkEnd\n";
        let (bytes, diagnostics) = compile_str(text, DriverOptions::default()).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
        assert_eq!(
            track_of(&bytes),
            [0x00, 0x90, 48, 1, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn metas_and_payloads() {
        let text = "MFile 1 1 96\nMTrk\n\
                    0 Meta SeqName \"Song\"\n\
                    0 Meta 0x0a \"a\\x01\"\n\
                    0 SeqNr 7\n\
                    0 Tempo 500000\n\
                    0 KeySig -2 minor\n\
                    0 SMPTE 96 1 2 3 4\n\
                    0 SeqSpec 00 20\n\
                    0 SysEx f0 7e \\\n\t f7\n\
                    0 Arb f3 01\n\
                    0 Meta TrkEnd\n\
                    TrkEnd\n";
        let (bytes, diagnostics) = compile_str(text, DriverOptions::default()).unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(
            track_of(&bytes),
            [
                0x00, 0xFF, 0x03, 0x04, b'S', b'o', b'n', b'g', //
                0x00, 0xFF, 0x0A, 0x02, b'a', 0x01, //
                0x00, 0xFF, 0x00, 0x02, 0x00, 0x07, //
                0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
                0x00, 0xFF, 0x59, 0x02, 0xFE, 0x01, //
                0x00, 0xFF, 0x54, 0x05, 96, 1, 2, 3, 4, //
                0x00, 0xFF, 0x7F, 0x02, 0x00, 0x20, //
                0x00, 0xF0, 0x02, 0x7E, 0xF7, //
                0x00, 0xF7, 0x02, 0xF3, 0x01, //
                0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn smpte_header() {
        let (bytes, _) = compile_str("MFile 0 1 -25 40\nMTrk\nTrkEnd\n", DriverOptions::default())
            .unwrap();
        assert_eq!(&bytes[12..14], &[0xE7, 0x28]);
    }

    #[test]
    fn fatal_errors() {
        assert!(matches!(
            compile_str("MTrk\n", DriverOptions::default()),
            Err(TextError::MissingHeader)
        ));
        assert!(matches!(
            compile_str("MFile 0 1 96\n0 On ch=1 n=1 v=1\n", DriverOptions::default()),
            Err(TextError::MissingTrackStart { line: 2 })
        ));
        assert!(matches!(
            compile_str("MFile 0 1 96\nMTrk\n0 On ch=1 n=1 v=1\n", DriverOptions::default()),
            Err(TextError::UnterminatedTrack { .. })
        ));
    }
}
