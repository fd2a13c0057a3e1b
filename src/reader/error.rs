use std::io;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while decoding a Standard MIDI File.

Every one of them is fatal for the file being decoded.
"#]
#[derive(Debug, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// The file does not start with `MThd`.
    #[error("expected the MThd header chunk")]
    ExpectedHeaderChunk,
    /// The header chunk is not 6 bytes long.
    #[error("header chunk length is {0}, expected 6")]
    InvalidHeaderLength(u32),
    /// A chunk after the header is not a track.
    #[error("expected an MTrk chunk, found {0:?}")]
    ExpectedTrackChunk([u8; 4]),
    /// A data byte arrived before any status byte in this track.
    #[error("unexpected running status")]
    UnexpectedRunningStatus,
    /// A byte that cannot start an event.
    #[error("unexpected byte 0x{0:02x}")]
    MalformedEvent(u8),
    /// A channel message data byte has its top bit set.
    #[error("invalid data byte 0x{0:02x}")]
    InvalidDataByte(u8),
    /// An event runs past the declared track length.
    #[error("event crosses the end of its track chunk")]
    ChunkOverrun,
    /// Sysex continuation was pending but another event came.
    #[error("didn't find expected continuation of a sysex, found 0x{0:02x}")]
    ExpectedSysexContinuation(u8),
    /// The track ended while a sysex continuation was pending.
    #[error("track ended inside a split sysex message")]
    UnterminatedSysex,
    /// A variable-length quantity longer than 4 bytes.
    #[error("variable-length quantity too long")]
    VlqOverflow,
    /// The source ran out in the middle of a structure.
    #[error("premature end of stream")]
    TruncatedStream,
    /// The scratch buffer could not grow.
    #[error("could not allocate {0} bytes for an event payload")]
    Allocation(usize),
    /// The byte source failed.
    #[error("reading the byte source: {0}")]
    Io(#[from] io::Error),
    /// The event sink refused an event.
    #[error("event sink: {0}")]
    Sink(Box<dyn std::error::Error + Send + Sync>),
}

impl ReaderErrorKind {
    /// True for violations of the file grammar.
    pub const fn is_format_violation(&self) -> bool {
        use ReaderErrorKind::*;
        matches!(
            self,
            ExpectedHeaderChunk
                | InvalidHeaderLength(_)
                | ExpectedTrackChunk(_)
                | UnexpectedRunningStatus
                | MalformedEvent(_)
                | InvalidDataByte(_)
                | ChunkOverrun
                | ExpectedSysexContinuation(_)
                | UnterminatedSysex
                | VlqOverflow
        )
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the source ended in the middle of a structure
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::TruncatedStream)
    }
    /// True for violations of the file grammar
    pub const fn is_format_violation(&self) -> bool {
        self.kind.is_format_violation()
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
    /// Create a new truncated stream error
    pub const fn truncated(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::TruncatedStream,
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
