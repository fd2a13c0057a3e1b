#![doc = r#"
Writing Standard MIDI Files

[`SmfWriter`] emits the header chunk at once, then one track at a time
through a [`TrackWriter`]. Track lengths are unknown until the track is
done, so the writer leaves a placeholder and rewrites it afterwards: the
byte sink must support that through [`MidiSink::write_at`].
"#]

mod encoder;
pub use encoder::*;

mod error;
pub use error::*;

use std::io;

/// A byte sink that can rewrite bytes it already wrote.
pub trait MidiSink {
    /// Append bytes
    fn write_all(&mut self, buf: &[u8]) -> WriteResult<()>;
    /// The offset the next byte will be written at
    fn position(&mut self) -> WriteResult<u64>;
    /// Overwrite bytes at `pos`, then continue appending at the end.
    fn write_at(&mut self, buf: &[u8], pos: u64) -> WriteResult<()>;
}

impl MidiSink for Vec<u8> {
    fn write_all(&mut self, buf: &[u8]) -> WriteResult<()> {
        self.try_reserve(buf.len())
            .map_err(|_| WriteError::Io(io::ErrorKind::OutOfMemory.into()))?;
        self.extend_from_slice(buf);
        Ok(())
    }
    fn position(&mut self) -> WriteResult<u64> {
        Ok(self.len() as u64)
    }
    fn write_at(&mut self, buf: &[u8], pos: u64) -> WriteResult<()> {
        let out = usize::try_from(pos)
            .ok()
            .and_then(|start| self.get_mut(start..start.checked_add(buf.len())?))
            .ok_or(WriteError::InvalidSeekback(pos))?;
        out.copy_from_slice(buf);
        Ok(())
    }
}

impl<S: MidiSink + ?Sized> MidiSink for &mut S {
    fn write_all(&mut self, buf: &[u8]) -> WriteResult<()> {
        (**self).write_all(buf)
    }
    fn position(&mut self) -> WriteResult<u64> {
        (**self).position()
    }
    fn write_at(&mut self, buf: &[u8], pos: u64) -> WriteResult<()> {
        (**self).write_at(buf, pos)
    }
}

/// Use any seekable [`io::Write`], such as a [`std::fs::File`], as a sink.
pub struct SeekWrap<T>(pub T);

impl<T: io::Write + io::Seek> MidiSink for SeekWrap<T> {
    fn write_all(&mut self, buf: &[u8]) -> WriteResult<()> {
        io::Write::write_all(&mut self.0, buf)?;
        Ok(())
    }
    fn position(&mut self) -> WriteResult<u64> {
        Ok(io::Seek::stream_position(&mut self.0)?)
    }
    fn write_at(&mut self, buf: &[u8], pos: u64) -> WriteResult<()> {
        io::Seek::seek(&mut self.0, io::SeekFrom::Start(pos))?;
        io::Write::write_all(&mut self.0, buf)?;
        io::Seek::seek(&mut self.0, io::SeekFrom::End(0))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vec_seekback() {
        let mut out = Vec::new();
        out.write_all(&[1, 2, 3, 4]).unwrap();
        out.write_at(&[9, 9], 1).unwrap();
        assert_eq!(out, [1, 9, 9, 4]);
        assert!(matches!(
            out.write_at(&[0, 0], 3),
            Err(WriteError::InvalidSeekback(3))
        ));
    }

    #[test]
    fn seek_wrap_appends_after_rewrite() {
        let mut out = SeekWrap(io::Cursor::new(Vec::new()));
        out.write_all(&[0, 0, 7]).unwrap();
        out.write_at(&[5], 0).unwrap();
        out.write_all(&[8]).unwrap();
        assert_eq!(out.position().unwrap(), 4);
        assert_eq!(out.0.into_inner(), [5, 0, 7, 8]);
    }
}
