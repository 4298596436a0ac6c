use std::io;

use bytes::Bytes;

/// A readable source of body bytes with optional seek support.
///
/// Positions and sizes are in bytes. Streams that can't seek return an
/// [`io::ErrorKind::Unsupported`] error from [`seek`](Stream::seek).
pub trait Stream {
    fn is_seekable(&self) -> bool;

    /// Returns true once the read position reached the end of the stream.
    fn eof(&self) -> bool;

    /// Current read position.
    fn tell(&self) -> io::Result<u64>;

    /// Moves the read position to `pos`, measured from the start.
    fn seek(&mut self, pos: u64) -> io::Result<()>;

    fn rewind(&mut self) -> io::Result<()> {
        self.seek(0)
    }

    /// Reads up to `max_bytes`. An empty result means no more data.
    fn read(&mut self, max_bytes: usize) -> io::Result<Bytes>;

    /// Reads everything from the current position to the end.
    fn get_contents(&mut self) -> io::Result<Bytes>;

    /// Total size in bytes, if known.
    fn size(&self) -> Option<u64>;
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }

    fn eof(&self) -> bool {
        (**self).eof()
    }

    fn tell(&self) -> io::Result<u64> {
        (**self).tell()
    }

    fn seek(&mut self, pos: u64) -> io::Result<()> {
        (**self).seek(pos)
    }

    fn rewind(&mut self) -> io::Result<()> {
        (**self).rewind()
    }

    fn read(&mut self, max_bytes: usize) -> io::Result<Bytes> {
        (**self).read(max_bytes)
    }

    fn get_contents(&mut self) -> io::Result<Bytes> {
        (**self).get_contents()
    }

    fn size(&self) -> Option<u64> {
        (**self).size()
    }
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }

    fn eof(&self) -> bool {
        (**self).eof()
    }

    fn tell(&self) -> io::Result<u64> {
        (**self).tell()
    }

    fn seek(&mut self, pos: u64) -> io::Result<()> {
        (**self).seek(pos)
    }

    fn rewind(&mut self) -> io::Result<()> {
        (**self).rewind()
    }

    fn read(&mut self, max_bytes: usize) -> io::Result<Bytes> {
        (**self).read(max_bytes)
    }

    fn get_contents(&mut self) -> io::Result<Bytes> {
        (**self).get_contents()
    }

    fn size(&self) -> Option<u64> {
        (**self).size()
    }
}

pub(crate) fn unseekable() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "stream is not seekable")
}
