use core::fmt;

/// The words of the text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `MFile`, the header line
    MFile,
    /// `MTrk`, opens a track
    MTrk,
    /// `TrkEnd`, closes a track; also `Meta TrkEnd`
    TrkEnd,
    /// `On`
    On,
    /// `Off`
    Off,
    /// `PoPr` or `PolyPr`
    PolyPr,
    /// `Par` or `Param`
    Param,
    /// `Pb`
    PitchBend,
    /// `PrCh` or `ProgCh`
    ProgCh,
    /// `ChPr` or `ChanPr`
    ChanPr,
    /// `SysEx`
    SysEx,
    /// `Arb`, an escape packet
    Arb,
    /// `Meta`
    Meta,
    /// `SeqSpec`
    SeqSpec,
    /// `Text`
    Text,
    /// `Copyright`
    Copyright,
    /// `SeqName`
    SeqName,
    /// `TrkName`
    TrkName,
    /// `InstrName`
    InstrName,
    /// `Lyric`
    Lyric,
    /// `Marker`
    Marker,
    /// `Cue`
    Cue,
    /// `Unrec`
    Unrec,
    /// `SeqNr`
    SeqNr,
    /// `KeySig`
    KeySig,
    /// `Tempo`
    Tempo,
    /// `TimeSig`
    TimeSig,
    /// `SMPTE`
    Smpte,
    /// `minor`
    Minor,
    /// `major`
    Major,
    /// `ch=`
    Ch,
    /// `n=` or `note=`
    Note,
    /// `v=`, `val=` or `vol=`
    Val,
    /// `c=` or `con=`
    Con,
    /// `p=` or `prog=`
    Prog,
}

impl Keyword {
    /// Look up a word. Field names include their `=`.
    pub fn from_word(word: &str) -> Option<Self> {
        use Keyword::*;
        Some(match word {
            "MFile" => MFile,
            "MTrk" => MTrk,
            "TrkEnd" => TrkEnd,
            "On" => On,
            "Off" => Off,
            "PoPr" | "PolyPr" => PolyPr,
            "Par" | "Param" => Param,
            "Pb" => PitchBend,
            "PrCh" | "ProgCh" => ProgCh,
            "ChPr" | "ChanPr" => ChanPr,
            "SysEx" => SysEx,
            "Arb" => Arb,
            "Meta" => Meta,
            "SeqSpec" => SeqSpec,
            "Text" => Text,
            "Copyright" => Copyright,
            "SeqName" => SeqName,
            "TrkName" => TrkName,
            "InstrName" => InstrName,
            "Lyric" => Lyric,
            "Marker" => Marker,
            "Cue" => Cue,
            "Unrec" => Unrec,
            "SeqNr" => SeqNr,
            "KeySig" => KeySig,
            "Tempo" => Tempo,
            "TimeSig" => TimeSig,
            "SMPTE" => Smpte,
            "minor" => Minor,
            "major" => Major,
            "ch=" => Ch,
            "n=" | "note=" => Note,
            "v=" | "val=" | "vol=" => Val,
            "c=" | "con=" => Con,
            "p=" | "prog=" => Prog,
            _ => return None,
        })
    }

    /// The meta type of the text keywords
    pub const fn text_kind(self) -> Option<u8> {
        use Keyword::*;
        Some(match self {
            Text => 0x01,
            Copyright => 0x02,
            SeqName | TrkName => 0x03,
            InstrName => 0x04,
            Lyric => 0x05,
            Marker => 0x06,
            Cue => 0x07,
            Unrec => 0x08,
            _ => return None,
        })
    }
}

/// One lexical unit of the text format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A decimal or `0x` number; bare hex bytes in hex mode
    Int(i64),
    /// The bytes between double quotes, escapes untouched
    Str(Vec<u8>),
    /// A known word
    Keyword(Keyword),
    /// A note name such as `c#4`
    Note(String),
    /// `/` or `:` between the parts of a time or a time signature
    Slash,
    /// End of a line
    Eol,
    /// End of the input
    Eof,
    /// Anything else
    Error(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "\"{}\"", String::from_utf8_lossy(s)),
            Self::Keyword(k) => write!(f, "{k:?}"),
            Self::Note(n) => f.write_str(n),
            Self::Slash => f.write_str("/"),
            Self::Eol => f.write_str("end of line"),
            Self::Eof => f.write_str("end of input"),
            Self::Error(s) => f.write_str(s),
        }
    }
}

/// A source of tokens for [`compile`](super::compile).
pub trait TokenStream {
    /// The next token. Returns [`Token::Eof`] forever once the input is done.
    fn next_token(&mut self) -> Token;

    /// Read bare words as hexadecimal bytes until the end of the line.
    fn set_hex_mode(&mut self, on: bool);

    /// Line of the last token returned, from 1
    fn line(&self) -> usize;
}
