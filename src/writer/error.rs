use std::io;
use thiserror::Error;

/// Errors raised while encoding a file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The byte sink failed
    #[error("writing the byte sink: {0}")]
    Io(#[from] io::Error),
    /// A length placeholder could not be rewritten
    #[error("invalid seekback to offset {0}")]
    InvalidSeekback(u64),
    /// Channels are 0 to 15
    #[error("channel {0} out of range")]
    ChannelOutOfRange(u8),
    /// Channel events carry 1 or 2 data bytes
    #[error("a channel event carries 1 or 2 data bytes, not {0}")]
    InvalidDataLength(usize),
    /// A sysex needs at least its lead byte
    #[error("system exclusive event without a lead byte")]
    EmptySysex,
    /// Track chunks are limited to `u32::MAX` bytes
    #[error("track of {0} bytes does not fit a chunk")]
    TrackTooLong(u64),
    /// A value does not fit the field it is written to
    #[error("{what} out of range: {value}")]
    ValueOutOfRange {
        /// Which field
        what: &'static str,
        /// The offending value
        value: u64,
    },
}

/// The Write Result type (see [`WriteError`])
pub type WriteResult<T> = Result<T, WriteError>;
