#![doc = r#"
Reading Standard MIDI Files

A [`Reader`] pulls bytes from any [`MidiSource`] and tracks its position for
error reports. The [`SmfDecoder`] walks the chunk structure and hands each
event to an [`SmfSink`].
"#]

mod decoder;
pub use decoder::*;

mod error;
pub use error::*;

use std::io;

/// A sequential byte source that reports the end of its input.
pub trait MidiSource {
    /// The next byte, `None` at the end of the input.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;
}

impl MidiSource for &[u8] {
    #[inline]
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let Some((&first, rest)) = self.split_first() else {
            return Ok(None);
        };
        *self = rest;
        Ok(Some(first))
    }
}

/// Adapts any [`io::Read`] into a [`MidiSource`].
///
/// Reads one byte at a time, so wrap files in an [`io::BufReader`].
pub struct IoSource<R>(pub R);

impl<R: io::Read> MidiSource for IoSource<R> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8];
        loop {
            match self.0.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// A position-tracking reader over a [`MidiSource`]
pub struct Reader<R> {
    source: R,
    position: usize,
}

impl<'a> Reader<&'a [u8]> {
    /// Read from a byte slice
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R: io::Read> Reader<IoSource<R>> {
    /// Read from anything implementing [`io::Read`]
    pub const fn from_reader(read: R) -> Self {
        Self::new(IoSource(read))
    }
}

impl<R: MidiSource> Reader<R> {
    /// Wrap a source
    pub const fn new(source: R) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// How many bytes were consumed so far
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    pub(crate) const fn error(&self, kind: ReaderErrorKind) -> ReaderError {
        ReaderError::new(self.position, kind)
    }

    /// The next byte, or `None` at the end of the input.
    pub fn try_read_u8(&mut self) -> ReadResult<Option<u8>> {
        let byte = self
            .source
            .next_byte()
            .map_err(|e| ReaderError::new(self.position, e.into()))?;
        if byte.is_some() {
            self.position += 1;
        }
        Ok(byte)
    }

    /// The next byte; the end of the input is an error.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        self.try_read_u8()?
            .ok_or(ReaderError::truncated(self.position))
    }

    /// Read exactly `N` bytes.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut bytes = [0u8; N];
        for byte in bytes.iter_mut() {
            *byte = self.read_u8()?;
        }
        Ok(bytes)
    }

    /// Read a chunk tag.
    ///
    /// Returns `None` if the input ends cleanly before the tag.
    pub fn read_chunk_tag(&mut self) -> ReadResult<Option<[u8; 4]>> {
        let Some(first) = self.try_read_u8()? else {
            return Ok(None);
        };
        let rest: [u8; 3] = self.read_exact_size()?;
        Ok(Some([first, rest[0], rest[1], rest[2]]))
    }

    /// Read a big-endian `u32`
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Append `len` bytes to `buf`.
    ///
    /// The buffer grows by at most [`Self::RESERVE_STEP`] bytes ahead of the
    /// input, so a length field alone cannot force a large allocation.
    pub fn read_into(&mut self, buf: &mut Vec<u8>, len: usize) -> ReadResult<()> {
        let mut remaining = len;
        while remaining > 0 {
            let step = remaining.min(Self::RESERVE_STEP);
            buf.try_reserve(step)
                .map_err(|_| self.error(ReaderErrorKind::Allocation(len)))?;
            for _ in 0..step {
                buf.push(self.read_u8()?);
            }
            remaining -= step;
        }
        Ok(())
    }

    /// Largest reservation made by [`Self::read_into`] at once
    pub const RESERVE_STEP: usize = 4096;
}
