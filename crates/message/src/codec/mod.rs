//! Wire rendering of a response head.
//!
//! The [`HeadEncoder`] turns status lines and header lines into raw
//! HTTP/1.x bytes. It is what [`WireSink`](crate::emit::WireSink) uses when it
//! commits the head it collected to its writer.

mod head_encoder;

pub use head_encoder::HeadEncoder;
pub use head_encoder::HeadLine;
