use std::io;
use thiserror::Error;

use crate::writer::WriteError;

/// Errors of the [`TextEmitter`](super::TextEmitter).
#[derive(Debug, Error)]
pub enum EmitError {
    /// Only formats 0, 1 and 2 are rendered
    #[error("can't deal with format {0} files")]
    UnsupportedFormat(u16),
    /// The text output failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors raised while compiling text into a file.
///
/// [`Validation`](TextError::Validation) and [`Syntax`](TextError::Syntax)
/// only cost the line they occur on when they happen inside a track.
#[derive(Debug, Error)]
pub enum TextError {
    /// An argument is out of range
    #[error("{line}: {message}")]
    Validation {
        /// Line of the argument
        line: usize,
        /// What was wrong
        message: String,
    },
    /// A token of the wrong kind
    #[error("{line}: {message}")]
    Syntax {
        /// Line of the token
        line: usize,
        /// What was expected
        message: String,
    },
    /// The input does not start with `MFile`
    #[error("missing MFile, can't continue")]
    MissingHeader,
    /// A track did not start with `MTrk`
    #[error("{line}: missing MTrk")]
    MissingTrackStart {
        /// Where `MTrk` was expected
        line: usize,
    },
    /// The input ended inside a track
    #[error("{line}: unexpected end of input inside a track")]
    UnterminatedTrack {
        /// Last line of the input
        line: usize,
    },
    /// The writer refused an event
    #[error(transparent)]
    Write(#[from] WriteError),
}

impl TextError {
    /// True for errors that only discard their line
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Syntax { .. })
    }
}

/// The Text Result type (see [`TextError`])
pub type TextResult<T> = Result<T, TextError>;
