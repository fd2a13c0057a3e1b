use crate::writer::WriterOptions;

/// How the time field of each text line is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeMode {
    /// Ticks since the start of the track
    #[default]
    Absolute,
    /// Ticks since the previous event
    Delta,
    /// `measure:beat:tick`, following the time signatures.
    ///
    /// Files with an SMPTE division fall back to [`TimeMode::Absolute`].
    Musical,
    /// `measure:beat:tick` spanned since the previous event, under the meter in
    /// force at that event.
    ///
    /// Files with an SMPTE division fall back to [`TimeMode::Delta`].
    MusicalDelta,
}

/// Rendering options of the [`TextEmitter`](super::TextEmitter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextOptions {
    /// The time field
    pub time_mode: TimeMode,
    /// Padded columns and long labels. Implies `note_names`.
    pub verbose: bool,
    /// Write pitches as `c#4` instead of `49`
    pub note_names: bool,
    /// Fold strings and hex dumps once a line reaches this column
    pub fold: Option<usize>,
}

impl TextOptions {
    /// True if pitches are written as names
    pub const fn names_notes(&self) -> bool {
        self.note_names || self.verbose
    }
}

/// Options of [`compile`](super::compile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverOptions {
    /// Read times as deltas instead of absolute positions.
    ///
    /// A `measure:beat:tick` time is then a span under the current meter.
    pub delta_times: bool,
    /// Options of the underlying writer
    pub writer: WriterOptions,
}
