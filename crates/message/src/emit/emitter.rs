//! Response emitters.
//!
//! An emitter writes a [`ResponseModel`] onto a [`Sink`]. Both emitters in
//! this module share the head handling:
//!
//! 1. refuse to run when the sink already started a response
//! 2. add `Content-Length` when it is missing and the body size is known
//! 3. write the status line, then every header value as its own line, the
//!    first line of a name replacing and the following ones appending
//! 4. flush the buffering layers opened since emission started
//!
//! They differ in how the body is written. [`StreamEmitter`] reads the body in
//! bounded chunks and honors a `Content-Range` header; [`BufferedEmitter`]
//! writes the whole body at once.
//!
//! The body stream stays locked for the whole call. Anything written to the
//! sink before an error is returned stays written.

use std::cmp;
use std::io;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_RANGE};
use tracing::{debug, error, trace};

use crate::emit::{ContentRange, Sink};
use crate::protocol::body::{LimitStream, Stream};
use crate::protocol::header::word_case;
use crate::protocol::{EmitError, HttpMessage, ResponseModel};

/// Default upper bound for a single body read.
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 8 * 1024;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    max_chunk_bytes: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self { max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES }
    }
}

impl EmitterConfig {
    /// Sets the largest chunk read from the body at once; zero is treated as one.
    #[must_use]
    pub fn with_max_chunk_bytes(self, max_chunk_bytes: usize) -> Self {
        Self { max_chunk_bytes: cmp::max(max_chunk_bytes, 1) }
    }

    pub fn max_chunk_bytes(&self) -> usize {
        self.max_chunk_bytes
    }
}

/// Progress of a single emission, only ever moving forward.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum EmitState {
    NotStarted,
    StatusLineSent,
    HeadersSent,
    BodyStreaming,
    Done,
}

pub trait Emitter {
    fn emit(&self, response: &ResponseModel, sink: &mut dyn Sink) -> Result<(), EmitError>;
}

/// Streams the body in chunks of at most `max_chunk_bytes`.
///
/// When the response carries a parseable `Content-Range`, only the bytes from
/// `first` to `last` inclusive are written. A malformed `Content-Range` is
/// ignored and the whole body is written.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamEmitter {
    config: EmitterConfig,
}

impl StreamEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    fn emit_body(&self, stream: &mut dyn Stream, sink: &mut dyn Sink) -> io::Result<u64> {
        if !stream.is_seekable() {
            let contents = stream.get_contents()?;
            return write_chunk(sink, contents);
        }

        stream.rewind()?;
        let mut written = 0;
        while !stream.eof() {
            let chunk = stream.read(self.config.max_chunk_bytes)?;
            if chunk.is_empty() {
                break;
            }
            written += write_chunk(sink, chunk)?;
        }
        Ok(written)
    }

    fn emit_range(&self, stream: &mut dyn Stream, range: &ContentRange, sink: &mut dyn Sink) -> io::Result<u64> {
        if !stream.is_seekable() {
            let contents = stream.get_contents()?;
            let len = contents.len();
            let start = usize::try_from(range.first()).map_or(len, |first| cmp::min(first, len));
            let end = usize::try_from(range.last()).map_or(len, |last| cmp::min(last.saturating_add(1), len));
            return write_chunk(sink, contents.slice(start..cmp::max(start, end)));
        }

        let length = range.byte_count();
        let mut view = LimitStream::new(stream, range.first(), length)?;
        view.rewind()?;

        let mut remaining = length;
        while remaining > 0 && !view.eof() {
            let max = usize::try_from(remaining).map_or(self.config.max_chunk_bytes, |r| cmp::min(r, self.config.max_chunk_bytes));
            let chunk = view.read(max)?;
            if chunk.is_empty() {
                break;
            }
            remaining -= chunk.len() as u64;
            write_chunk(sink, chunk)?;
        }
        Ok(length - remaining)
    }
}

impl Emitter for StreamEmitter {
    fn emit(&self, response: &ResponseModel, sink: &mut dyn Sink) -> Result<(), EmitError> {
        check_not_started(sink)?;
        let start_level = sink.buffer_level();

        let mut stream = response.body().lock();
        let mut state = EmitState::NotStarted;
        emit_head(response, stream.size(), sink, &mut state)?;
        sink.flush_buffer_layers(start_level)?;

        let range = ContentRange::parse(&response.header_line(CONTENT_RANGE.as_str()));
        advance(&mut state, EmitState::BodyStreaming);
        let written = match &range {
            Some(range) => {
                debug!(range = %range, "emit body range");
                self.emit_range(&mut **stream, range, sink)?
            }
            None => self.emit_body(&mut **stream, sink)?,
        };

        advance(&mut state, EmitState::Done);
        debug!(status = response.status_code(), bytes = written, "response emitted");
        Ok(())
    }
}

/// Writes the whole body in one piece, ignoring `Content-Range`.
///
/// Seekable bodies are rewound first.
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferedEmitter;

impl Emitter for BufferedEmitter {
    fn emit(&self, response: &ResponseModel, sink: &mut dyn Sink) -> Result<(), EmitError> {
        check_not_started(sink)?;
        let start_level = sink.buffer_level();

        let mut stream = response.body().lock();
        let mut state = EmitState::NotStarted;
        emit_head(response, stream.size(), sink, &mut state)?;
        sink.flush_buffer_layers(start_level)?;

        advance(&mut state, EmitState::BodyStreaming);
        if stream.is_seekable() {
            stream.rewind()?;
        }
        let written = write_chunk(sink, stream.get_contents()?)?;

        advance(&mut state, EmitState::Done);
        debug!(status = response.status_code(), bytes = written, "response emitted");
        Ok(())
    }
}

fn check_not_started(sink: &dyn Sink) -> Result<(), EmitError> {
    if sink.has_response_started() {
        error!("response already started on sink, refusing to emit");
        return Err(EmitError::precondition("a response has already been started on this sink"));
    }
    Ok(())
}

fn emit_head(response: &ResponseModel, body_size: Option<u64>, sink: &mut dyn Sink, state: &mut EmitState) -> io::Result<()> {
    let content_length = match body_size {
        Some(size) if !response.has_header(CONTENT_LENGTH.as_str()) => {
            debug!(content_length = size, "inject content-length from body size");
            Some(size.to_string())
        }
        _ => None,
    };

    sink.write_status_line(response.protocol_version(), response.status_code(), response.reason_phrase())?;
    advance(state, EmitState::StatusLineSent);

    for (name, values) in response.header_table() {
        let name = word_case(name);
        for (i, value) in values.iter().enumerate() {
            sink.write_header_line(&name, value, i == 0)?;
        }
    }
    if let Some(content_length) = content_length {
        sink.write_header_line(&word_case(CONTENT_LENGTH.as_str()), &content_length, true)?;
    }
    advance(state, EmitState::HeadersSent);
    Ok(())
}

fn write_chunk(sink: &mut dyn Sink, chunk: Bytes) -> io::Result<u64> {
    if chunk.is_empty() {
        return Ok(0);
    }
    let len = chunk.len() as u64;
    sink.write_body_chunk(chunk)?;
    Ok(len)
}

fn advance(state: &mut EmitState, next: EmitState) {
    debug_assert!(next > *state, "emission can't move from {state:?} to {next:?}");
    trace!(from = ?state, to = ?next, "emission state");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::MockSink;
    use crate::emit::WireSink;
    use crate::protocol::body::{Body, MemoryStream, ReaderStream};
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn response(body: Body) -> ResponseModel {
        ResponseModel::default().with_body(body)
    }

    fn emit_to_string(emitter: &dyn Emitter, response: &ResponseModel) -> String {
        let mut sink = WireSink::new(Vec::new());
        emitter.emit(response, &mut sink).unwrap();
        String::from_utf8(sink.finish().unwrap()).unwrap()
    }

    #[test]
    fn refuses_started_sink_without_writing() {
        let mut sink = MockSink::new();
        sink.expect_has_response_started().return_const(true);
        sink.expect_buffer_level().never();
        sink.expect_write_status_line().never();
        sink.expect_write_header_line().never();
        sink.expect_write_body_chunk().never();
        sink.expect_flush_buffer_layers().never();

        let err = StreamEmitter::default().emit(&response(Body::from("body")), &mut sink).unwrap_err();
        assert!(err.is_precondition());

        let err = BufferedEmitter.emit(&response(Body::from("body")), &mut sink).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn head_then_body_in_order() {
        let response = ResponseModel::new(200)
            .unwrap()
            .with_header("x-multi", ["a", "b"])
            .unwrap()
            .with_body(Body::from("hello"));

        let mut seq = Sequence::new();
        let mut sink = MockSink::new();
        sink.expect_has_response_started().return_const(false);
        sink.expect_buffer_level().return_const(0_usize);
        sink.expect_write_status_line()
            .withf(|version, status, reason| version.as_str() == "1.1" && *status == 200 && reason == "OK")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        sink.expect_write_header_line()
            .withf(|name, value, replace| name == "X-Multi" && value == "a" && *replace)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        sink.expect_write_header_line()
            .withf(|name, value, replace| name == "X-Multi" && value == "b" && !*replace)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        sink.expect_write_header_line()
            .withf(|name, value, replace| name == "Content-Length" && value == "5" && *replace)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        sink.expect_flush_buffer_layers().with(eq(0)).times(1).in_sequence(&mut seq).returning(|_| Ok(()));
        sink.expect_write_body_chunk()
            .with(eq(Bytes::from_static(b"hello")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        StreamEmitter::default().emit(&response, &mut sink).unwrap();
    }

    #[test]
    fn existing_content_length_is_kept() {
        let response = response(Body::from("hello")).with_header("content-length", "3").unwrap();
        let output = emit_to_string(&StreamEmitter::default(), &response);
        assert_eq!(output, "HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\nhello");
    }

    #[test]
    fn unknown_size_leaves_content_length_unset() {
        let response = response(Body::new(ReaderStream::new(&b"streamed"[..])));
        let output = emit_to_string(&StreamEmitter::default(), &response);
        assert_eq!(output, "HTTP/1.1 200 OK\r\n\r\nstreamed");
    }

    #[test]
    fn empty_reason_phrase_is_omitted() {
        let response = ResponseModel::new(299).unwrap().with_protocol_version("2").unwrap();
        let output = emit_to_string(&StreamEmitter::default(), &response);
        assert_eq!(output, "HTTP/2 299\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn seekable_body_is_rewound_and_chunked() {
        let stream = MemoryStream::from("0123456789");
        let body = Body::new(stream);
        body.lock().seek(7).unwrap();

        let mut sink = WireSink::new(Vec::new());
        let emitter = StreamEmitter::new(EmitterConfig::default().with_max_chunk_bytes(4));
        emitter.emit(&response(body), &mut sink).unwrap();

        let output = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert!(output.ends_with("\r\n\r\n0123456789"), "{output:?}");
    }

    #[test]
    fn range_on_seekable_body() {
        let response = response(Body::from("0123456789"))
            .with_header("Content-Range", "bytes 2-5/10")
            .unwrap();
        let output = emit_to_string(&StreamEmitter::new(EmitterConfig::default().with_max_chunk_bytes(3)), &response);
        assert!(output.ends_with("\r\n\r\n2345"), "{output:?}");
        assert!(output.contains("Content-Range: bytes 2-5/10\r\n"));
    }

    #[test]
    fn range_on_unseekable_body() {
        let response = response(Body::new(ReaderStream::new(&b"0123456789"[..])))
            .with_header("Content-Range", "bytes 7-20/*")
            .unwrap();
        let output = emit_to_string(&StreamEmitter::default(), &response);
        assert!(output.ends_with("\r\n\r\n789"), "{output:?}");
    }

    #[test]
    fn unrepresentable_range_end_emits_whole_body() {
        let response = response(Body::from("0123456789"))
            .with_header("Content-Range", "bytes 0-18446744073709551615/*")
            .unwrap();
        let output = emit_to_string(&StreamEmitter::default(), &response);
        assert!(output.ends_with("Content-Length: 10\r\n\r\n0123456789"), "{output:?}");
    }

    #[test]
    fn malformed_range_emits_whole_body() {
        let response = response(Body::from("0123456789"))
            .with_header("Content-Range", "bytes=2-5")
            .unwrap();
        let output = emit_to_string(&StreamEmitter::default(), &response);
        assert!(output.ends_with("\r\n\r\n0123456789"), "{output:?}");
    }

    #[test]
    fn buffered_emitter_ignores_range() {
        let response = response(Body::from("0123456789"))
            .with_header("Content-Range", "bytes 2-5/10")
            .unwrap();
        response.body().lock().seek(5).unwrap();

        let output = emit_to_string(&BufferedEmitter, &response);
        assert!(output.ends_with("\r\n\r\n0123456789"), "{output:?}");
    }

    #[test]
    fn pending_layers_are_flushed_before_body() {
        let mut sink = WireSink::new(Vec::new());
        sink.push_buffer_layer();

        StreamEmitter::default().emit(&response(Body::from("body")), &mut sink).unwrap();
        assert_eq!(sink.buffer_level(), 1);
        assert!(!sink.has_response_started());

        let output = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(output, "HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\nbody");
    }

    #[test]
    fn body_error_keeps_written_prefix() {
        struct FailingStream {
            reads: usize,
        }

        impl Stream for FailingStream {
            fn is_seekable(&self) -> bool {
                true
            }
            fn eof(&self) -> bool {
                false
            }
            fn tell(&self) -> io::Result<u64> {
                Ok(0)
            }
            fn seek(&mut self, _pos: u64) -> io::Result<()> {
                Ok(())
            }
            fn read(&mut self, _max_bytes: usize) -> io::Result<Bytes> {
                self.reads += 1;
                if self.reads > 1 {
                    return Err(io::Error::other("disk gone"));
                }
                Ok(Bytes::from_static(b"prefix"))
            }
            fn get_contents(&mut self) -> io::Result<Bytes> {
                Err(io::Error::other("disk gone"))
            }
            fn size(&self) -> Option<u64> {
                None
            }
        }

        let mut sink = WireSink::new(Vec::new());
        let err = StreamEmitter::default()
            .emit(&response(Body::new(FailingStream { reads: 0 })), &mut sink)
            .unwrap_err();
        assert!(matches!(err, EmitError::Io { .. }));
        assert!(sink.has_response_started());

        let output = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(output, "HTTP/1.1 200 OK\r\n\r\nprefix");
    }
}
