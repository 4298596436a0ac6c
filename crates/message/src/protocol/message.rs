//! The immutable message core shared by requests and responses.
//!
//! A [`MessageCore`] bundles the protocol version, the [`HeaderTable`] and the
//! [`Body`] handle. Requests and responses embed one and expose the common
//! `with_*` operations through the [`HttpMessage`] trait. Every `with_*`
//! operation validates its input first and only then builds the new value, so
//! a failed call never leaves a half-updated message behind.

use std::fmt;

use indexmap::IndexMap;

use crate::protocol::MessageError;
use crate::protocol::body::Body;
use crate::protocol::header::{HeaderTable, HeaderValues};

/// HTTP protocol versions a message may declare.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    Http10,
    #[default]
    Http11,
    Http2,
}

impl ProtocolVersion {
    /// Parses `1.0`, `1.1` or `2`.
    pub fn parse(version: &str) -> Result<Self, MessageError> {
        match version {
            "1.0" => Ok(ProtocolVersion::Http10),
            "1.1" => Ok(ProtocolVersion::Http11),
            "2" => Ok(ProtocolVersion::Http2),
            _ => Err(MessageError::invalid_protocol_version(version)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolVersion::Http10 => "1.0",
            ProtocolVersion::Http11 => "1.1",
            ProtocolVersion::Http2 => "2",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ProtocolVersion> for http::Version {
    fn from(value: ProtocolVersion) -> Self {
        match value {
            ProtocolVersion::Http10 => http::Version::HTTP_10,
            ProtocolVersion::Http11 => http::Version::HTTP_11,
            ProtocolVersion::Http2 => http::Version::HTTP_2,
        }
    }
}

impl TryFrom<http::Version> for ProtocolVersion {
    type Error = MessageError;

    fn try_from(value: http::Version) -> Result<Self, Self::Error> {
        match value {
            http::Version::HTTP_10 => Ok(ProtocolVersion::Http10),
            http::Version::HTTP_11 => Ok(ProtocolVersion::Http11),
            http::Version::HTTP_2 => Ok(ProtocolVersion::Http2),
            v => Err(MessageError::invalid_protocol_version(format!("{v:?}"))),
        }
    }
}

/// Protocol version, headers and body of a message.
#[derive(Debug, Clone, Default)]
pub struct MessageCore {
    version: ProtocolVersion,
    headers: HeaderTable,
    body: Body,
}

impl MessageCore {
    pub fn new(headers: HeaderTable, body: Body) -> Self {
        Self { version: ProtocolVersion::default(), headers, body }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn header_table(&self) -> &HeaderTable {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    #[must_use]
    pub(crate) fn replace_version(&self, version: ProtocolVersion) -> Self {
        Self { version, headers: self.headers.clone(), body: self.body.clone() }
    }

    #[must_use]
    pub(crate) fn replace_headers(&self, headers: HeaderTable) -> Self {
        Self { version: self.version, headers, body: self.body.clone() }
    }

    #[must_use]
    pub(crate) fn replace_body(&self, body: Body) -> Self {
        Self { version: self.version, headers: self.headers.clone(), body }
    }
}

/// Operations shared by every message type.
///
/// Implementors only provide access to their [`MessageCore`] and a way to
/// rebuild themselves around a new one; all derived values keep every other
/// field of the receiver.
pub trait HttpMessage: Sized {
    fn core(&self) -> &MessageCore;

    #[must_use]
    fn with_core(&self, core: MessageCore) -> Self;

    fn protocol_version(&self) -> ProtocolVersion {
        self.core().version()
    }

    /// Returns a copy declaring `version`, one of `1.0`, `1.1` or `2`.
    fn with_protocol_version(&self, version: &str) -> Result<Self, MessageError> {
        let version = ProtocolVersion::parse(version)?;
        Ok(self.with_core(self.core().replace_version(version)))
    }

    fn header_table(&self) -> &HeaderTable {
        self.core().header_table()
    }

    /// Snapshot of all headers, canonical name to values.
    fn headers(&self) -> IndexMap<String, Vec<String>> {
        self.header_table().to_map()
    }

    fn header(&self, name: &str) -> &[String] {
        self.header_table().get(name)
    }

    fn header_line(&self, name: &str) -> String {
        self.header_table().get_line(name)
    }

    fn has_header(&self, name: &str) -> bool {
        self.header_table().has(name)
    }

    fn with_header(&self, name: &str, values: impl Into<HeaderValues>) -> Result<Self, MessageError> {
        let headers = self.header_table().set(name, values)?;
        Ok(self.with_core(self.core().replace_headers(headers)))
    }

    fn with_added_header(&self, name: &str, values: impl Into<HeaderValues>) -> Result<Self, MessageError> {
        let headers = self.header_table().add(name, values)?;
        Ok(self.with_core(self.core().replace_headers(headers)))
    }

    #[must_use]
    fn without_header(&self, name: &str) -> Self {
        let headers = self.header_table().remove(name);
        self.with_core(self.core().replace_headers(headers))
    }

    fn body(&self) -> &Body {
        self.core().body()
    }

    #[must_use]
    fn with_body(&self, body: Body) -> Self {
        self.with_core(self.core().replace_body(body))
    }
}

impl HttpMessage for MessageCore {
    fn core(&self) -> &MessageCore {
        self
    }

    fn with_core(&self, core: MessageCore) -> Self {
        core
    }
}
