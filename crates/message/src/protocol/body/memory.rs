use std::cmp;
use std::io;

use bytes::Bytes;

use crate::protocol::body::Stream;

/// A seekable stream over an in-memory buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStream {
    data: Bytes,
    pos: usize,
}

impl MemoryStream {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into(), pos: 0 }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl Stream for MemoryStream {
    fn is_seekable(&self) -> bool {
        true
    }

    fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn tell(&self) -> io::Result<u64> {
        Ok(self.pos as u64)
    }

    fn seek(&mut self, pos: u64) -> io::Result<()> {
        // seeking past the end is allowed and simply reads nothing
        self.pos = usize::try_from(pos).unwrap_or(usize::MAX);
        Ok(())
    }

    fn read(&mut self, max_bytes: usize) -> io::Result<Bytes> {
        if self.eof() {
            return Ok(Bytes::new());
        }
        let end = cmp::min(self.data.len(), self.pos.saturating_add(max_bytes));
        let bytes = self.data.slice(self.pos..end);
        self.pos = end;
        Ok(bytes)
    }

    fn get_contents(&mut self) -> io::Result<Bytes> {
        self.read(usize::MAX)
    }

    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

impl From<&'static str> for MemoryStream {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MemoryStream {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for MemoryStream {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<Bytes> for MemoryStream {
    fn from(value: Bytes) -> Self {
        Self::new(value)
    }
}
