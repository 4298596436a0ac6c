use std::io;

use bytes::Bytes;

use crate::protocol::ProtocolVersion;

/// Where a serialized response goes.
///
/// A sink owns two pieces of state the emitter consults but never changes
/// directly: whether a response has already started on it, and a stack of
/// output buffering layers. Layers are numbered from 0 (no buffering);
/// [`flush_buffer_layers`](Sink::flush_buffer_layers) closes layers until the
/// given level is reached, passing their content on.
#[cfg_attr(test, mockall::automock)]
pub trait Sink {
    /// Returns true once a response head has been committed.
    fn has_response_started(&self) -> bool;

    /// Number of currently open buffering layers.
    fn buffer_level(&self) -> usize;

    fn write_status_line(&mut self, version: ProtocolVersion, status: u16, reason: &str) -> io::Result<()>;

    /// Writes one header line.
    ///
    /// With `replace` set, previous lines for `name` (compared
    /// case-insensitively) are dropped; otherwise the line is appended.
    fn write_header_line(&mut self, name: &str, value: &str, replace: bool) -> io::Result<()>;

    fn write_body_chunk(&mut self, chunk: Bytes) -> io::Result<()>;

    /// Closes and passes on every layer above `to_level`, newest first.
    fn flush_buffer_layers(&mut self, to_level: usize) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn has_response_started(&self) -> bool {
        (**self).has_response_started()
    }

    fn buffer_level(&self) -> usize {
        (**self).buffer_level()
    }

    fn write_status_line(&mut self, version: ProtocolVersion, status: u16, reason: &str) -> io::Result<()> {
        (**self).write_status_line(version, status, reason)
    }

    fn write_header_line(&mut self, name: &str, value: &str, replace: bool) -> io::Result<()> {
        (**self).write_header_line(name, value, replace)
    }

    fn write_body_chunk(&mut self, chunk: Bytes) -> io::Result<()> {
        (**self).write_body_chunk(chunk)
    }

    fn flush_buffer_layers(&mut self, to_level: usize) -> io::Result<()> {
        (**self).flush_buffer_layers(to_level)
    }
}
