use std::io;
use std::io::{Read, Seek, SeekFrom};

use bytes::{Bytes, BytesMut};

use crate::protocol::body::Stream;
use crate::protocol::body::stream::unseekable;

/// A forward-only stream over any [`Read`] implementation.
///
/// The size is unknown unless a hint was given with [`with_size`](Self::with_size).
#[derive(Debug)]
pub struct ReaderStream<R> {
    reader: R,
    pos: u64,
    eof: bool,
    size: Option<u64>,
}

impl<R: Read> ReaderStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pos: 0, eof: false, size: None }
    }

    pub fn with_size(reader: R, size: u64) -> Self {
        Self { reader, pos: 0, eof: false, size: Some(size) }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Stream for ReaderStream<R> {
    fn is_seekable(&self) -> bool {
        false
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn tell(&self) -> io::Result<u64> {
        Ok(self.pos)
    }

    fn seek(&mut self, _pos: u64) -> io::Result<()> {
        Err(unseekable())
    }

    fn read(&mut self, max_bytes: usize) -> io::Result<Bytes> {
        read_some(&mut self.reader, max_bytes, &mut self.pos, &mut self.eof)
    }

    fn get_contents(&mut self) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        let n = self.reader.read_to_end(&mut buf)?;
        self.pos += n as u64;
        self.eof = true;
        Ok(Bytes::from(buf))
    }

    fn size(&self) -> Option<u64> {
        self.size
    }
}

/// A seekable stream over a [`Read`] + [`Seek`] source such as a file.
///
/// The size is measured once, when the stream is created.
#[derive(Debug)]
pub struct SeekableStream<R> {
    reader: R,
    pos: u64,
    size: u64,
}

impl<R: Read + Seek> SeekableStream<R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        let size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self { reader, pos: 0, size })
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> Stream for SeekableStream<R> {
    fn is_seekable(&self) -> bool {
        true
    }

    fn eof(&self) -> bool {
        self.pos >= self.size
    }

    fn tell(&self) -> io::Result<u64> {
        Ok(self.pos)
    }

    fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.pos = self.reader.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn read(&mut self, max_bytes: usize) -> io::Result<Bytes> {
        let mut eof = false;
        let bytes = read_some(&mut self.reader, max_bytes, &mut self.pos, &mut eof)?;
        if eof {
            // the source shrank underneath us
            self.size = self.pos;
        }
        Ok(bytes)
    }

    fn get_contents(&mut self) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        let n = self.reader.read_to_end(&mut buf)?;
        self.pos += n as u64;
        Ok(Bytes::from(buf))
    }

    fn size(&self) -> Option<u64> {
        Some(self.size)
    }
}

/// Fills up to `max_bytes` from `reader`, retrying short reads until the
/// buffer is full or the reader reports end of input.
fn read_some<R: Read>(reader: &mut R, max_bytes: usize, pos: &mut u64, eof: &mut bool) -> io::Result<Bytes> {
    let mut buf = BytesMut::zeroed(max_bytes);
    let mut filled = 0;
    while filled < max_bytes {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                *eof = true;
                break;
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    buf.truncate(filled);
    *pos += filled as u64;
    Ok(buf.freeze())
}
