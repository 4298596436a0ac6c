//! Writing a response out.
//!
//! - [`Sink`]: the output capability, with its started flag and buffering layers
//! - [`WireSink`]: a sink producing HTTP/1.x bytes on any `io::Write`
//! - [`ContentRange`]: permissive parsing of the `Content-Range` header
//! - [`Emitter`]: [`StreamEmitter`] for chunked, range-aware output and
//!   [`BufferedEmitter`] for single-write output

mod sink;
#[cfg(test)]
pub(crate) use sink::MockSink;
pub use sink::Sink;

mod wire;
pub use wire::WireSink;

mod content_range;
pub use content_range::CompleteLength;
pub use content_range::ContentRange;

mod emitter;
pub use emitter::BufferedEmitter;
pub use emitter::DEFAULT_MAX_CHUNK_BYTES;
pub use emitter::Emitter;
pub use emitter::EmitterConfig;
pub use emitter::StreamEmitter;
