use super::SmpteFps;

/// The header division.
///
/// This is either the number of ticks per quarter note or
/// the alternative SMPTE format. Every conversion from ticks into
/// time must branch on which one a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Division {
    /// The file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(u16),

    /// The file's delta times are defined using SMPTE frames
    Smpte(SmpteDivision),
}

impl Division {
    /// Interpret the 16-bit header field.
    ///
    /// A set top bit marks SMPTE timing: the high byte is the negated
    /// frame rate and the low byte the ticks per frame.
    pub const fn from_raw(raw: u16) -> Self {
        let [hi, lo] = raw.to_be_bytes();
        if hi & 0x80 == 0 {
            return Self::TicksPerQuarterNote(raw);
        }
        Self::Smpte(SmpteDivision {
            frames_per_second: (hi as i8).unsigned_abs(),
            ticks_per_frame: lo,
        })
    }

    /// The 16-bit header field
    pub const fn raw(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(tpqn) => *tpqn & 0x7FFF,
            Self::Smpte(smpte) => {
                let hi = (smpte.frames_per_second as i8).wrapping_neg() as u8;
                u16::from_be_bytes([hi, smpte.ticks_per_frame])
            }
        }
    }

    /// Returns Some if the timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            _ => None,
        }
    }

    /// The tick length of one beat when counting measures.
    ///
    /// SMPTE files have no beat, so one second of ticks stands in for it.
    pub const fn beat_ticks(&self) -> u32 {
        match self {
            Self::TicksPerQuarterNote(t) => *t as u32,
            Self::Smpte(s) => s.ticks_per_second(),
        }
    }

    /// Convert a tick count into seconds given a tempo in microseconds per quarter note.
    ///
    /// The tempo is ignored for SMPTE timing.
    pub fn ticks_to_seconds(&self, ticks: u64, tempo: u32) -> f64 {
        match self {
            Self::TicksPerQuarterNote(tpqn) => {
                // µs_per_tick = tempo / TPQN
                (ticks as f64 * tempo as f64) / (*tpqn as f64 * 1_000_000.)
            }
            Self::Smpte(smpte) => ticks as f64 / smpte.ticks_per_second() as f64,
        }
    }

    /// Convert seconds into a (truncated) tick count given a tempo in microseconds
    /// per quarter note.
    pub fn seconds_to_ticks(&self, seconds: f64, tempo: u32) -> u64 {
        match self {
            Self::TicksPerQuarterNote(tpqn) => {
                (seconds * 1_000_000. * *tpqn as f64 / tempo as f64) as u64
            }
            Self::Smpte(smpte) => (seconds * smpte.ticks_per_second() as f64) as u64,
        }
    }
}

/// A representation of the `smpte` division of a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteDivision {
    /// Nominal frames per second (24, 25, 29 or 30 in valid files)
    pub frames_per_second: u8,
    /// Subdivisions of a frame
    pub ticks_per_frame: u8,
}

impl SmpteDivision {
    /// Returns the frame rate, if it is one of the four standard rates.
    pub const fn fps(&self) -> Option<SmpteFps> {
        match self.frames_per_second {
            24 => Some(SmpteFps::TwentyFour),
            25 => Some(SmpteFps::TwentyFive),
            //drop frame (29.97)
            29 => Some(SmpteFps::TwentyNine),
            30 => Some(SmpteFps::Thirty),
            _ => None,
        }
    }

    /// Ticks in one second at the nominal frame rate.
    pub const fn ticks_per_second(&self) -> u32 {
        let fps = match self.fps() {
            Some(fps) => fps.as_division() as u32,
            None => self.frames_per_second as u32,
        };
        fps * self.ticks_per_frame as u32
    }
}
