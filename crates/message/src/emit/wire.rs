//! A [`Sink`] writing HTTP/1.x bytes to any [`io::Write`].
//!
//! The sink behaves like a server's output layer: status and header lines
//! are collected until the first byte of output reaches the writer, at which
//! point the head is committed and can no longer change. Output written while
//! buffering layers are open stays in the newest layer until it is flushed.

use std::io;
use std::io::Write;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::{HeadEncoder, HeadLine};
use crate::emit::Sink;
use crate::protocol::{ProtocolVersion, default_reason_phrase};

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusLine {
    version: ProtocolVersion,
    status: u16,
    reason: String,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self { version: ProtocolVersion::default(), status: 200, reason: default_reason_phrase(200).to_owned() }
    }
}

#[derive(Debug)]
pub struct WireSink<W> {
    writer: W,
    encoder: HeadEncoder,
    status: StatusLine,
    headers: Vec<(String, String)>,
    layers: Vec<BytesMut>,
    committed: bool,
}

impl<W: Write> WireSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            encoder: HeadEncoder,
            status: StatusLine::default(),
            headers: Vec::new(),
            layers: Vec::new(),
            committed: false,
        }
    }

    /// Opens a new buffering layer on top of the stack.
    pub fn push_buffer_layer(&mut self) {
        self.layers.push(BytesMut::new());
    }

    /// Header lines collected so far, in order.
    pub fn header_lines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Flushes all layers, commits the head if nothing was written yet, and
    /// returns the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_buffer_layers(0)?;
        self.commit()?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.committed {
            return Err(io::Error::other("response head has already been sent"));
        }
        Ok(())
    }

    fn commit(&mut self) -> io::Result<()> {
        if self.committed {
            return Ok(());
        }

        let mut head = BytesMut::new();
        let status = &self.status;
        self.encoder.encode(
            HeadLine::Status { version: status.version, status: status.status, reason: &status.reason },
            &mut head,
        )?;
        for (name, value) in &self.headers {
            self.encoder.encode(HeadLine::Header { name, value }, &mut head)?;
        }
        self.encoder.encode(HeadLine::End, &mut head)?;

        trace!(status = self.status.status, headers = self.headers.len(), head_size = head.len(), "commit response head");
        self.committed = true;
        self.writer.write_all(&head)
    }

    fn write_out(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.commit()?;
        if bytes.is_empty() {
            return Ok(());
        }
        self.writer.write_all(bytes)
    }
}

impl<W: Write> Sink for WireSink<W> {
    fn has_response_started(&self) -> bool {
        self.committed
    }

    fn buffer_level(&self) -> usize {
        self.layers.len()
    }

    fn write_status_line(&mut self, version: ProtocolVersion, status: u16, reason: &str) -> io::Result<()> {
        self.ensure_open()?;
        self.status = StatusLine { version, status, reason: reason.to_owned() };
        Ok(())
    }

    fn write_header_line(&mut self, name: &str, value: &str, replace: bool) -> io::Result<()> {
        self.ensure_open()?;
        if replace {
            self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        }
        self.headers.push((name.to_owned(), value.to_owned()));
        Ok(())
    }

    fn write_body_chunk(&mut self, chunk: Bytes) -> io::Result<()> {
        match self.layers.last_mut() {
            Some(layer) => {
                layer.extend_from_slice(&chunk);
                Ok(())
            }
            None => self.write_out(&chunk),
        }
    }

    fn flush_buffer_layers(&mut self, to_level: usize) -> io::Result<()> {
        while self.layers.len() > to_level {
            let Some(layer) = self.layers.pop() else { break };
            match self.layers.last_mut() {
                Some(parent) => parent.extend_from_slice(&layer),
                None => {
                    self.write_out(&layer)?;
                    self.writer.flush()?;
                }
            }
        }
        Ok(())
    }
}
