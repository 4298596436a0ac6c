//! HTTP response model.
//!
//! A [`ResponseModel`] adds a status code and a reason phrase to the message
//! core. The two are independent: setting a status only fills in the reason
//! phrase when none is given.

use http::StatusCode;

use crate::ensure;
use crate::protocol::MessageError;
use crate::protocol::body::Body;
use crate::protocol::header::{HeaderTable, validator};
use crate::protocol::message::{HttpMessage, MessageCore};

#[derive(Debug, Clone)]
pub struct ResponseModel {
    core: MessageCore,
    status: u16,
    reason: String,
}

impl Default for ResponseModel {
    fn default() -> Self {
        Self { core: MessageCore::default(), status: 200, reason: default_reason_phrase(200).to_owned() }
    }
}

impl ResponseModel {
    /// Creates an empty-bodied response with `status` and its default reason phrase.
    pub fn new(status: u16) -> Result<Self, MessageError> {
        Self::from_parts(status, HeaderTable::new(), Body::empty())
    }

    pub fn from_parts(status: u16, headers: HeaderTable, body: Body) -> Result<Self, MessageError> {
        validate_status(status)?;
        Ok(Self { core: MessageCore::new(headers, body), status, reason: default_reason_phrase(status).to_owned() })
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    /// Returns a copy with `status` and its default reason phrase.
    pub fn with_status(&self, status: u16) -> Result<Self, MessageError> {
        self.with_status_and_reason(status, "")
    }

    /// Returns a copy with `status` and `reason`.
    ///
    /// An empty `reason` falls back to the default phrase for `status`, which
    /// is itself empty for codes without one.
    pub fn with_status_and_reason(&self, status: u16, reason: &str) -> Result<Self, MessageError> {
        validate_status(status)?;
        validate_reason(reason)?;

        let reason = if reason.is_empty() { default_reason_phrase(status) } else { reason };
        Ok(Self { core: self.core.clone(), status, reason: reason.to_owned() })
    }

    /// Returns a copy with `reason`, keeping the status code.
    pub fn with_reason_phrase(&self, reason: &str) -> Result<Self, MessageError> {
        validate_reason(reason)?;
        Ok(Self { core: self.core.clone(), status: self.status, reason: reason.to_owned() })
    }

    /// Builds an `http::Response<()>` with the same status, version and headers.
    ///
    /// Fails for header values the `http` crate does not accept, such as
    /// obs-folded ones.
    pub fn to_http_head(&self) -> Result<http::Response<()>, MessageError> {
        let mut builder = http::Response::builder().status(self.status).version(self.protocol_version().into());
        for (name, values) in self.header_table() {
            for value in values {
                builder = builder.header(name, value.as_str());
            }
        }
        builder.body(()).map_err(MessageError::invalid_header_value)
    }
}

impl HttpMessage for ResponseModel {
    fn core(&self) -> &MessageCore {
        &self.core
    }

    fn with_core(&self, core: MessageCore) -> Self {
        Self { core, status: self.status, reason: self.reason.clone() }
    }
}

/// Default reason phrase for `status`, empty for unknown codes.
pub fn default_reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status).ok().and_then(|status| status.canonical_reason()).unwrap_or("")
}

fn validate_status(status: u16) -> Result<(), MessageError> {
    ensure!((100..=599).contains(&status), MessageError::invalid_status_code(status));
    Ok(())
}

/// Reason phrases share the status line, so they follow the header value
/// rules minus folding: no CR or LF at all.
fn validate_reason(reason: &str) -> Result<(), MessageError> {
    ensure!(
        validator::is_valid_value(reason) && !reason.contains(['\r', '\n']),
        MessageError::invalid_reason_phrase(reason)
    );
    Ok(())
}
