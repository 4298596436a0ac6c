//! The immutable HTTP message model.
//!
//! Data flows strictly upward through this module:
//!
//! - **Header validation** ([`header::validator`]): token grammar for names,
//!   injection checks for values
//! - **Header storage** ([`header::HeaderTable`]): ordered, case-insensitive,
//!   case-preserving and persistent
//! - **Message core** ([`MessageCore`], [`HttpMessage`]): protocol version,
//!   headers and body handle, with copy-and-replace mutators
//! - **Requests and responses** ([`RequestModel`], [`ResponseModel`])
//! - **Bodies** ([`body`]): the [`Stream`](body::Stream) capability and the
//!   shared [`Body`](body::Body) handle
//!
//! Every `with_*` operation validates before it copies, so an error always
//! leaves the original value untouched.

pub mod body;
pub mod header;

mod message;
pub use message::HttpMessage;
pub use message::MessageCore;
pub use message::ProtocolVersion;

mod request;
pub use request::RequestModel;
pub use request::host_from_uri;

mod response;
pub use response::ResponseModel;
pub use response::default_reason_phrase;

mod error;
pub use error::EmitError;
pub use error::HttpError;
pub use error::MessageError;
