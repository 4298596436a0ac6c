use std::cmp;
use std::io;

use bytes::Bytes;

use crate::protocol::body::Stream;
use crate::protocol::body::stream::unseekable;

/// A bounded view over a seekable stream.
///
/// The view covers `limit` bytes starting at `offset` of the inner stream.
/// Positions reported and accepted by the view are relative to `offset`, and
/// reads are clamped so the inner stream is never read past `offset + limit`.
#[derive(Debug)]
pub struct LimitStream<S> {
    inner: S,
    offset: u64,
    limit: u64,
}

impl<S: Stream> LimitStream<S> {
    /// Creates the view and moves the inner stream to `offset`.
    pub fn new(mut inner: S, offset: u64, limit: u64) -> io::Result<Self> {
        if !inner.is_seekable() {
            return Err(unseekable());
        }
        inner.seek(offset)?;
        Ok(Self { inner, offset, limit })
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn end(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }

    fn remaining(&self) -> io::Result<u64> {
        Ok(self.end().saturating_sub(self.inner.tell()?))
    }
}

impl<S: Stream> Stream for LimitStream<S> {
    fn is_seekable(&self) -> bool {
        true
    }

    fn eof(&self) -> bool {
        self.inner.eof() || self.remaining().map_or(true, |remaining| remaining == 0)
    }

    fn tell(&self) -> io::Result<u64> {
        Ok(self.inner.tell()?.saturating_sub(self.offset))
    }

    fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(self.offset + cmp::min(pos, self.limit))
    }

    fn read(&mut self, max_bytes: usize) -> io::Result<Bytes> {
        let remaining = self.remaining()?;
        if remaining == 0 {
            return Ok(Bytes::new());
        }
        let len = usize::try_from(remaining).map_or(max_bytes, |remaining| cmp::min(max_bytes, remaining));
        self.inner.read(len)
    }

    fn get_contents(&mut self) -> io::Result<Bytes> {
        let remaining = usize::try_from(self.remaining()?).unwrap_or(usize::MAX);
        self.read(remaining)
    }

    fn size(&self) -> Option<u64> {
        self.inner.size().map(|size| cmp::min(size.saturating_sub(self.offset), self.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::body::{MemoryStream, ReaderStream};

    #[test]
    fn view_is_bounded() {
        let mut view = LimitStream::new(MemoryStream::from("0123456789"), 2, 5).unwrap();

        assert_eq!(view.size(), Some(5));
        assert_eq!(view.tell().unwrap(), 0);
        assert_eq!(view.read(3).unwrap(), "234");
        assert_eq!(view.read(100).unwrap(), "56");
        assert!(view.eof());
        assert!(view.read(100).unwrap().is_empty());
        assert_eq!(view.into_inner().tell().unwrap(), 7);
    }

    #[test]
    fn rewind_returns_to_offset() {
        let mut view = LimitStream::new(MemoryStream::from("0123456789"), 4, 3).unwrap();
        assert_eq!(view.get_contents().unwrap(), "456");

        view.rewind().unwrap();
        assert_eq!(view.get_contents().unwrap(), "456");

        view.seek(100).unwrap();
        assert!(view.eof());
    }

    #[test]
    fn view_past_end_of_inner() {
        let mut view = LimitStream::new(MemoryStream::from("0123"), 2, 10).unwrap();
        assert_eq!(view.size(), Some(2));
        assert_eq!(view.get_contents().unwrap(), "23");
        assert!(view.eof());
    }

    #[test]
    fn requires_seekable_inner() {
        let result = LimitStream::new(ReaderStream::new(&b"abc"[..]), 1, 1);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::Unsupported);
    }
}
