//! HTTP head encoder serializing status and header lines
//!
//! # Wire format
//!
//! - status line: `HTTP/{version} {status}[ {reason}]\r\n`, the reason is left
//!   out together with its separating space when it is empty
//! - header line: `{name}: {value}\r\n`, written exactly as given
//! - end of head: a bare `\r\n`

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::ProtocolVersion;

/// Initial buffer size reserved for a status or header line
const INIT_LINE_SIZE: usize = 256;

/// One line of a response head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadLine<'a> {
    Status { version: ProtocolVersion, status: u16, reason: &'a str },
    Header { name: &'a str, value: &'a str },
    /// The empty line closing the head
    End,
}

/// Encoder for response head lines implementing the [`Encoder`] trait.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadEncoder;

impl Encoder<HeadLine<'_>> for HeadEncoder {
    type Error = io::Error;

    fn encode(&mut self, item: HeadLine<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_LINE_SIZE);
        match item {
            HeadLine::Status { version, status, reason } => {
                write!(FastWrite(dst), "HTTP/{version} {status}")?;
                if !reason.is_empty() {
                    dst.put_u8(b' ');
                    dst.put_slice(reason.as_bytes());
                }
                dst.put_slice(b"\r\n");
            }
            HeadLine::Header { name, value } => {
                dst.put_slice(name.as_bytes());
                dst.put_slice(b": ");
                dst.put_slice(value.as_bytes());
                dst.put_slice(b"\r\n");
            }
            HeadLine::End => dst.put_slice(b"\r\n"),
        }
        Ok(())
    }
}

/// Adapter letting `write!` format straight into a `BytesMut`.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
