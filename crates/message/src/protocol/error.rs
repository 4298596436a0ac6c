use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("message error: {source}")]
    MessageError {
        #[from]
        source: MessageError,
    },

    #[error("emit error: {source}")]
    EmitError {
        #[from]
        source: EmitError,
    },
}

/// Validation failures raised by the message model.
///
/// Each variant carries the rejected input. The value that was being derived
/// from is never modified when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("invalid header name: {name:?}")]
    InvalidHeaderName { name: String },

    #[error("invalid header value: {reason}")]
    InvalidHeaderValue { reason: String },

    #[error("invalid http protocol version: {version:?}, expect one of 1.0, 1.1, 2")]
    InvalidProtocolVersion { version: String },

    #[error("invalid http method: {method:?}")]
    InvalidMethod { method: String },

    #[error("invalid request target: {target:?}, request target can't contain whitespace")]
    InvalidRequestTarget { target: String },

    #[error("invalid status code: {code}, expect a value in 100..=599")]
    InvalidStatusCode { code: u16 },

    #[error("invalid reason phrase: {reason:?}")]
    InvalidReasonPhrase { reason: String },
}

impl MessageError {
    pub fn invalid_header_name<S: ToString>(name: S) -> Self {
        Self::InvalidHeaderName { name: name.to_string() }
    }

    pub fn invalid_header_value<S: ToString>(reason: S) -> Self {
        Self::InvalidHeaderValue { reason: reason.to_string() }
    }

    pub fn invalid_protocol_version<S: ToString>(version: S) -> Self {
        Self::InvalidProtocolVersion { version: version.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn invalid_request_target<S: ToString>(target: S) -> Self {
        Self::InvalidRequestTarget { target: target.to_string() }
    }

    pub fn invalid_status_code(code: u16) -> Self {
        Self::InvalidStatusCode { code }
    }

    pub fn invalid_reason_phrase<S: ToString>(reason: S) -> Self {
        Self::InvalidReasonPhrase { reason: reason.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum EmitError {
    /// The sink has already started a response, nothing was written.
    #[error("unable to emit response: {reason}")]
    Precondition { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl EmitError {
    pub fn precondition<S: ToString>(reason: S) -> Self {
        Self::Precondition { reason: reason.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the sink refused the response before any output
    pub fn is_precondition(&self) -> bool {
        matches!(self, EmitError::Precondition { .. })
    }
}
