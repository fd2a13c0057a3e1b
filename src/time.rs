#![doc = r#"
Musical time: measures, beats and ticks

A time signature change starts a new segment. The measures started under
the previous signature are folded into the new segment's first measure
number, so counting continues across the change:

```text
ticks    0 ........ 768 ........... 1056
meter    4/4         3/4
measure  0 1         2 3 ...
```

A change inside a measure cuts that measure short. It keeps its number and
the new signature begins with the next one, so every position names exactly
one tick:

```text
ticks    0 ........ 768 .. 800 ........ 992
meter    4/4               2/4
measure  0 1         2     3            4
```

Segments are kept for the whole file. Every track is read from tick 0
against the same segments, which lets the time signatures of a conductor
track apply to the tracks after it.
"#]

use core::fmt;

/// A point in a track as `measure:beat:tick`, all counted from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MusicalTime {
    /// Measures since the start
    pub measure: u64,
    /// Beat within the measure
    pub beat: u64,
    /// Tick within the beat
    pub tick: u64,
}

impl fmt::Display for MusicalTime {
    /// `{}` gives `1:2:3`, `{:#}` gives `001:02:003`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{:03}:{:02}:{:03}", self.measure, self.beat, self.tick)
        } else {
            write!(f, "{}:{}:{}", self.measure, self.beat, self.tick)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Meter {
    start: u64,
    measures_before: u64,
    beats_per_measure: u64,
    beat_ticks: u64,
}

impl Meter {
    const fn measure_ticks(&self) -> u64 {
        self.beats_per_measure * self.beat_ticks
    }
}

/// Converts between ticks and [`MusicalTime`] while tracking the current tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeModel {
    clicks: u64,
    initial: Meter,
    changes: Vec<Meter>,
    now: u64,
}

impl TimeModel {
    /// Four beats of `clicks` ticks per measure until a time signature says otherwise.
    ///
    /// `clicks` is the ticks per quarter note of the file.
    pub fn new(clicks: u16) -> Self {
        let clicks = (clicks as u64).max(1);
        Self {
            clicks,
            initial: Meter {
                start: 0,
                measures_before: 0,
                beats_per_measure: 4,
                beat_ticks: clicks,
            },
            changes: Vec::new(),
            now: 0,
        }
    }

    /// The current tick
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Back to tick 0 for the next track. Time signatures are kept.
    pub fn rewind(&mut self) {
        self.now = 0;
    }

    /// Move to `time` and return how far that was, `None` if it lies in the past.
    pub fn advance_to(&mut self, time: u64) -> Option<u64> {
        let delta = time.checked_sub(self.now)?;
        self.now = time;
        Some(delta)
    }

    fn meter_at(&self, time: u64) -> &Meter {
        let idx = self.changes.partition_point(|m| m.start <= time);
        self.changes[..idx].last().unwrap_or(&self.initial)
    }

    /// Ticks per beat at the current tick
    pub fn beat_ticks(&self) -> u64 {
        self.meter_at(self.now).beat_ticks
    }

    /// Beats per measure at the current tick
    pub fn beats_per_measure(&self) -> u64 {
        self.meter_at(self.now).beats_per_measure
    }

    /// Switch to `numerator / denominator` at the current tick.
    ///
    /// A signature set again at the same tick replaces the previous one, and
    /// any later segment is dropped.
    pub fn set_time_signature(&mut self, numerator: u8, denominator: u32) {
        let at = self.now;
        let keep = self.changes.partition_point(|m| m.start < at);
        self.changes.truncate(keep);
        let prev = *self.meter_at(at);
        let measures_before =
            prev.measures_before + (at - prev.start).div_ceil(prev.measure_ticks());
        let meter = Meter {
            start: at,
            measures_before,
            beats_per_measure: (numerator as u64).max(1),
            beat_ticks: (4 * self.clicks / (denominator as u64).max(1)).max(1),
        };
        #[cfg(feature = "tracing")]
        tracing::trace!("time signature {numerator}/{denominator} at {at}: {meter:?}");
        self.changes.push(meter);
    }

    /// Where `time` falls in measures, beats and ticks.
    pub fn position(&self, time: u64) -> MusicalTime {
        let meter = self.meter_at(time);
        let rel = time - meter.start;
        let beats = rel / meter.beat_ticks;
        MusicalTime {
            measure: beats / meter.beats_per_measure + meter.measures_before,
            beat: beats % meter.beats_per_measure,
            tick: rel % meter.beat_ticks,
        }
    }

    /// Measures, beats and ticks spanned by `delta` ticks under the current meter.
    pub fn span(&self, delta: u64) -> MusicalTime {
        let meter = self.meter_at(self.now);
        let beats = delta / meter.beat_ticks;
        MusicalTime {
            measure: beats / meter.beats_per_measure,
            beat: beats % meter.beats_per_measure,
            tick: delta % meter.beat_ticks,
        }
    }

    /// The ticks of a span read back under the current meter, `None` on overflow.
    pub fn span_ticks(&self, span: MusicalTime) -> Option<u64> {
        let meter = self.meter_at(self.now);
        span.measure
            .checked_mul(meter.beats_per_measure)?
            .checked_add(span.beat)?
            .checked_mul(meter.beat_ticks)?
            .checked_add(span.tick)
    }

    /// The tick of a musical position, `None` on overflow.
    ///
    /// Beats and ticks past the end of their measure or beat simply carry over.
    pub fn to_ticks(&self, position: MusicalTime) -> Option<u64> {
        let idx = self
            .changes
            .partition_point(|m| m.measures_before <= position.measure);
        let meter = self.changes[..idx].last().unwrap_or(&self.initial);
        let beats = (position.measure - meter.measures_before)
            .checked_mul(meter.beats_per_measure)?
            .checked_add(position.beat)?;
        beats
            .checked_mul(meter.beat_ticks)?
            .checked_add(position.tick)?
            .checked_add(meter.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(measure: u64, beat: u64, tick: u64) -> MusicalTime {
        MusicalTime { measure, beat, tick }
    }

    #[test]
    fn common_time_by_default() {
        let model = TimeModel::new(96);
        assert_eq!(model.position(0), at(0, 0, 0));
        assert_eq!(model.position(95), at(0, 0, 95));
        assert_eq!(model.position(96 * 5 + 7), at(1, 1, 7));
        assert_eq!(model.to_ticks(at(1, 1, 7)), Some(96 * 5 + 7));
    }

    #[test]
    fn measures_continue_across_a_signature_change() {
        let mut model = TimeModel::new(96);
        model.advance_to(768).unwrap();
        model.set_time_signature(3, 4);
        assert_eq!(model.position(767), at(1, 3, 95));
        assert_eq!(model.position(768), at(2, 0, 0));
        assert_eq!(model.position(768 + 3 * 96), at(3, 0, 0));

        // 6/8 halves the beat
        model.advance_to(768 + 3 * 96).unwrap();
        model.set_time_signature(6, 8);
        assert_eq!(model.beat_ticks(), 48);
        assert_eq!(model.position(768 + 3 * 96 + 48 * 7), at(4, 1, 0));
    }

    #[test]
    fn change_inside_a_measure_ends_it() {
        let mut model = TimeModel::new(96);
        model.advance_to(800).unwrap();
        model.set_time_signature(2, 4);
        assert_eq!(model.position(799), at(2, 0, 31));
        assert_eq!(model.position(800), at(3, 0, 0));
        assert_eq!(model.position(800 + 192), at(4, 0, 0));
        for tick in 700..1100 {
            assert_eq!(model.to_ticks(model.position(tick)), Some(tick), "{tick}");
        }
    }

    #[test]
    fn spans_follow_the_current_meter() {
        let mut model = TimeModel::new(96);
        assert_eq!(model.span(96 * 5 + 7), at(1, 1, 7));
        model.advance_to(384).unwrap();
        model.set_time_signature(6, 8);
        assert_eq!(model.span(48 * 7 + 1), at(1, 1, 1));
        assert_eq!(model.span_ticks(at(1, 1, 1)), Some(48 * 7 + 1));
        assert_eq!(model.span_ticks(at(u64::MAX, 0, 0)), None);
    }

    #[test]
    fn musical_positions_round_trip() {
        let mut model = TimeModel::new(120);
        model.advance_to(480 * 3).unwrap();
        model.set_time_signature(7, 8);
        for tick in [0, 17, 480 * 3 - 1, 480 * 3, 480 * 3 + 60 * 7 * 2 + 13, 100_000] {
            assert_eq!(model.to_ticks(model.position(tick)), Some(tick));
        }
    }

    #[test]
    fn later_tracks_share_signatures() {
        let mut model = TimeModel::new(96);
        model.advance_to(384).unwrap();
        model.set_time_signature(3, 4);
        model.rewind();
        assert_eq!(model.advance_to(10), Some(10));
        assert_eq!(model.position(384 + 288), at(2, 0, 0));
        assert_eq!(model.advance_to(5), None);
    }

    #[test]
    fn padded_display() {
        assert_eq!(at(1, 2, 3).to_string(), "1:2:3");
        assert_eq!(format!("{:#}", at(1, 2, 3)), "001:02:003");
    }
}
