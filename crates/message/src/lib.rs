//! Immutable HTTP messages and a range-aware response emitter
//!
//! This crate models already-parsed HTTP requests and responses as immutable
//! values, and writes a response out onto an output sink. It does no socket
//! I/O and parses no raw bytes: it sits between the code that decides what a
//! response is and the layer that actually puts bytes on the wire.
//!
//! # Features
//!
//! - Case-insensitive, case-preserving header table with copy-on-write updates
//! - Header injection protection, with support for obs-folded values
//! - Request and response models whose `with_*` operations validate before
//!   they copy
//! - Streaming emission in bounded chunks, honoring `Content-Range`
//! - Output buffering layers that are drained before the body is written
//!
//! # Example
//!
//! ```
//! use micro_message::emit::{Emitter, StreamEmitter, WireSink};
//! use micro_message::protocol::body::Body;
//! use micro_message::protocol::{HttpMessage, ResponseModel};
//!
//! let response = ResponseModel::new(200)
//!     .unwrap()
//!     .with_header("content-type", "text/plain")
//!     .unwrap()
//!     .with_body(Body::from("Hello World!"));
//!
//! let mut sink = WireSink::new(Vec::new());
//! StreamEmitter::default().emit(&response, &mut sink).unwrap();
//!
//! let bytes = sink.finish().unwrap();
//! assert_eq!(
//!     String::from_utf8(bytes).unwrap(),
//!     "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 12\r\n\r\nHello World!"
//! );
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: header validation, the header table, the message core,
//!   requests, responses, body streams and errors
//! - [`codec`]: rendering of status and header lines
//! - [`emit`]: the sink capability, `Content-Range` parsing and the emitters
//!
//! # Error Handling
//!
//! - [`protocol::MessageError`]: an input was rejected, the original value is
//!   unchanged
//! - [`protocol::EmitError`]: the sink refused the response, or I/O failed
//!   while writing it
//! - [`protocol::HttpError`]: wraps both
//!
//! # Limitations
//!
//! - Emission is synchronous; there is no timeout or cancellation
//! - A failure while the body is being written leaves the bytes already
//!   written in place

pub mod codec;
pub mod emit;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
