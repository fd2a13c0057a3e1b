use core::fmt;
use core::str::FromStr;
use thiserror::Error;

use crate::{DataByte, DataByteError};

#[doc = r#"
Identifies the pitch of some note message.

Pitches are 7-bit numbers. Each value corresponds to some [`Key`] and
[`Octave`], with octaves counted from zero: pitch `0` is `c0`, pitch `60` is
`c5` and pitch `127` is `g10`.

# Example
```rust
# use smftext::prelude::*;
let note = Note::from_databyte(63).unwrap();

assert_eq!(note.key(), Key::DSharp);
assert_eq!(note.octave(), Octave::new(5));
assert_eq!(note.to_string(), "d#5");
assert_eq!("eb5".parse::<Note>().unwrap(), note);
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note(DataByte);

impl Note {
    /// Create a new note.
    ///
    /// Checks for correctness (leading 0 bit).
    pub fn from_databyte<B>(rep: B) -> Result<Self, DataByteError>
    where
        B: TryInto<DataByte, Error = DataByteError>,
    {
        rep.try_into().map(Self)
    }

    /// Create a note from a checked data byte
    pub const fn from_byte(byte: DataByte) -> Self {
        Self(byte)
    }

    /// Create a note from a key and an octave.
    ///
    /// Returns `None` past `g10`, which is not representable in MIDI.
    pub const fn new(key: Key, octave: Octave) -> Option<Self> {
        let pitch = octave.value() as u16 * 12 + key.semitone() as u16;
        if pitch > 127 {
            return None;
        }
        Some(Self(DataByte(pitch as u8)))
    }

    /// Identifies the key of the note pressed
    #[inline]
    pub const fn key(&self) -> Key {
        Key::from_semitone(self.0.value() % 12)
    }

    /// Identifies the octave of the note pressed
    #[inline]
    pub const fn octave(&self) -> Octave {
        Octave(self.0.value() / 12)
    }

    /// Returns the underlying byte of the note
    pub const fn byte(&self) -> u8 {
        self.0.0
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key(), self.octave())
    }
}

/// Ways a note literal such as `c#5` can be rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteParseError {
    /// The literal does not start with a letter `a` to `g`.
    #[error("note names start with a letter from a to g, found {0:?}")]
    InvalidName(String),
    /// The literal has no octave number after its name.
    #[error("missing octave in note {0:?}")]
    InvalidOctave(String),
    /// The spelled pitch lies outside 0-127.
    #[error("note {0:?} is outside the range 0-127")]
    OutOfRange(String),
}

impl FromStr for Note {
    type Err = NoteParseError;

    /// Parses `[a-g][#+bB-]?<octave>`, letter case ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // semitones of a, b, c, d, e, f, g
        const INTERVALS: [i32; 7] = [9, 11, 0, 2, 4, 5, 7];

        let mut chars = s.chars();
        let letter = chars
            .next()
            .map(|c| c.to_ascii_lowercase())
            .filter(|c| ('a'..='g').contains(c))
            .ok_or_else(|| NoteParseError::InvalidName(s.to_owned()))?;
        let mut pitch = INTERVALS[(letter as u8 - b'a') as usize];

        let rest = chars.as_str();
        let rest = match rest.as_bytes().first() {
            Some(b'#' | b'+') => {
                pitch += 1;
                &rest[1..]
            }
            Some(b'b' | b'B' | b'-') => {
                pitch -= 1;
                &rest[1..]
            }
            _ => rest,
        };
        let octave: i32 = rest
            .parse()
            .map_err(|_| NoteParseError::InvalidOctave(s.to_owned()))?;

        octave
            .checked_mul(12)
            .and_then(|o| o.checked_add(pitch))
            .and_then(|p| u8::try_from(p).ok())
            .and_then(|p| DataByte::new(p).ok())
            .map(Self)
            .ok_or_else(|| NoteParseError::OutOfRange(s.to_owned()))
    }
}

#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[doc = r#"
One of the twelve pitch classes, spelled with sharps.
"#]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}
impl Key {
    /// Returns an array beginning with [`Key::C`] to [`Key::B`]
    pub fn all() -> [Key; 12] {
        use Key::*;
        [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B]
    }

    /// Returns true if the key is one of the five black keys.
    #[inline]
    pub const fn is_sharp(&self) -> bool {
        use Key::*;
        matches!(self, CSharp | DSharp | FSharp | GSharp | ASharp)
    }

    /// Identify the key from a pitch class (`pitch % 12`).
    #[inline]
    pub const fn from_semitone(semitone: u8) -> Self {
        use Key::*;
        match semitone % 12 {
            0 => C,
            1 => CSharp,
            2 => D,
            3 => DSharp,
            4 => E,
            5 => F,
            6 => FSharp,
            7 => G,
            8 => GSharp,
            9 => A,
            10 => ASharp,
            _ => B,
        }
    }

    /// Semitones above C
    pub const fn semitone(&self) -> u8 {
        use Key::*;
        match self {
            C => 0,
            CSharp => 1,
            D => 2,
            DSharp => 3,
            E => 4,
            F => 5,
            FSharp => 6,
            G => 7,
            GSharp => 8,
            A => 9,
            ASharp => 10,
            B => 11,
        }
    }

    /// Create a [`Note`] given this key and a provided [`Octave`]
    pub const fn with_octave(self, octave: Octave) -> Option<Note> {
        Note::new(self, octave)
    }
}
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Key::*;
        let name = match self {
            C => "c",
            CSharp => "c#",
            D => "d",
            DSharp => "d#",
            E => "e",
            F => "f",
            FSharp => "f#",
            G => "g",
            GSharp => "g#",
            A => "a",
            ASharp => "a#",
            B => "b",
        };
        f.write_str(name)
    }
}

#[doc = r#"
The octave of a [`Note`], `pitch / 12`. Values range from 0 to 10.
"#]
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Octave(u8);

impl Octave {
    /// Clamps to 10.
    pub const fn new(octave: u8) -> Self {
        if octave > 10 { Self(10) } else { Self(octave) }
    }

    /// The octave, from `[0,10]`
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn every_pitch_round_trips_through_its_name() {
    for pitch in 0..128u8 {
        let note = Note::from_databyte(pitch).unwrap();
        let parsed: Note = note.to_string().parse().unwrap();
        assert_eq!(parsed.byte(), pitch);
        assert_eq!(Note::new(note.key(), note.octave()), Some(note));
    }
}

#[test]
fn enharmonic_spellings() {
    let parse = |s: &str| s.parse::<Note>().map(|n| n.byte());
    assert_eq!(parse("c5"), Ok(60));
    assert_eq!(parse("C5"), Ok(60));
    assert_eq!(parse("c+5"), Ok(61));
    assert_eq!(parse("db5"), Ok(61));
    assert_eq!(parse("dB5"), Ok(61));
    assert_eq!(parse("d-5"), Ok(61));
    assert_eq!(parse("b#4"), Ok(60));
    assert_eq!(parse("g10"), Ok(127));
}

#[test]
fn rejects_bad_notes() {
    assert!(matches!("h4".parse::<Note>(), Err(NoteParseError::InvalidName(_))));
    assert!(matches!("c".parse::<Note>(), Err(NoteParseError::InvalidOctave(_))));
    assert!(matches!("cb0".parse::<Note>(), Err(NoteParseError::OutOfRange(_))));
    assert!(matches!("g#10".parse::<Note>(), Err(NoteParseError::OutOfRange(_))));
    assert!(matches!("c999999999".parse::<Note>(), Err(NoteParseError::OutOfRange(_))));
    assert!(matches!("c+-2147483648".parse::<Note>(), Err(NoteParseError::OutOfRange(_))));
}

#[test]
fn key_octave_pairs() {
    assert_eq!(Key::C.with_octave(Octave::new(5)).map(|n| n.byte()), Some(60));
    assert_eq!(Key::GSharp.with_octave(Octave::new(10)), None);
    assert!(Key::all().iter().filter(|k| k.is_sharp()).count() == 5);
}
