//! HTTP request model.
//!
//! A [`RequestModel`] adds a method, a URI and an optional request-target
//! override to the message core. The `Host` header is kept in sync with the
//! URI when it changes, following RFC 7230 section 5.4.

use http::Uri;
use http::uri::Scheme;
use indexmap::IndexMap;

use crate::ensure;
use crate::protocol::MessageError;
use crate::protocol::body::Body;
use crate::protocol::header::{HeaderTable, validator};
use crate::protocol::message::{HttpMessage, MessageCore};

const HOST: &str = "Host";

#[derive(Debug, Clone, Default)]
pub struct RequestModel {
    core: MessageCore,
    method: String,
    uri: Uri,
    request_target: Option<String>,
}

impl RequestModel {
    /// Creates a request for `method` and `uri`.
    ///
    /// An empty method means "unset" and is only accepted here. When the URI
    /// carries a host, a `Host` header is installed from it.
    pub fn new(method: &str, uri: Uri) -> Result<Self, MessageError> {
        Self::from_parts(method, uri, HeaderTable::new(), Body::empty())
    }

    /// Creates a request from already validated headers and a body.
    ///
    /// A `Host` header present in `headers` wins over the URI's host.
    pub fn from_parts(method: &str, uri: Uri, headers: HeaderTable, body: Body) -> Result<Self, MessageError> {
        if !method.is_empty() {
            validate_method(method)?;
        }

        let request = Self { core: MessageCore::new(headers, body), method: method.to_owned(), uri, request_target: None };
        Ok(request.sync_host(true))
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn with_method(&self, method: &str) -> Result<Self, MessageError> {
        validate_method(method)?;
        Ok(Self { method: method.to_owned(), ..self.clone() })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns a copy with `uri`, updating `Host` unless told otherwise.
    ///
    /// With `preserve_host` set and a `Host` header already present, the
    /// headers are left alone. A URI without a host never touches the headers.
    /// Otherwise every `Host` entry, however it is spelled, is replaced by a
    /// single `Host` computed from the new URI.
    #[must_use]
    pub fn with_uri(&self, uri: Uri, preserve_host: bool) -> Self {
        let request = Self { uri, ..self.clone() };
        request.sync_host(preserve_host)
    }

    /// The request target to put on the request line.
    ///
    /// An explicit override is returned verbatim. Otherwise it is the URI path
    /// plus `?query` when the query is non-empty, or `/` when that is empty.
    pub fn request_target(&self) -> String {
        if let Some(target) = &self.request_target {
            return target.clone();
        }

        let mut target = self.uri.path().to_owned();
        if let Some(query) = self.uri.query().filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }

        if target.is_empty() { "/".to_owned() } else { target }
    }

    pub fn with_request_target(&self, target: &str) -> Result<Self, MessageError> {
        ensure!(!target.chars().any(char::is_whitespace), MessageError::invalid_request_target(target));
        Ok(Self { request_target: Some(target.to_owned()), ..self.clone() })
    }

    fn sync_host(self, preserve_host: bool) -> Self {
        if preserve_host && self.has_header(HOST) {
            return self;
        }

        let Some(host) = host_from_uri(&self.uri) else {
            return self;
        };

        let headers = self.header_table().replace_trusted(HOST, host);
        Self { core: self.core.replace_headers(headers), ..self }
    }
}

impl HttpMessage for RequestModel {
    fn core(&self) -> &MessageCore {
        &self.core
    }

    fn with_core(&self, core: MessageCore) -> Self {
        Self { core, method: self.method.clone(), uri: self.uri.clone(), request_target: self.request_target.clone() }
    }

    /// Snapshot of all headers.
    ///
    /// When no `Host` header is stored but the URI has a host, a computed
    /// `Host` entry is included in the snapshot. The stored headers are not
    /// changed.
    fn headers(&self) -> IndexMap<String, Vec<String>> {
        let mut headers = self.header_table().to_map();
        if !self.has_header(HOST) {
            if let Some(host) = host_from_uri(&self.uri) {
                headers.insert(HOST.to_owned(), vec![host]);
            }
        }
        headers
    }
}

fn validate_method(method: &str) -> Result<(), MessageError> {
    ensure!(validator::is_token(method), MessageError::invalid_method(method));
    Ok(())
}

/// Computes the `Host` header value for `uri`, `host[:port]`.
///
/// The port is left out when it is the default one for the URI's scheme.
pub fn host_from_uri(uri: &Uri) -> Option<String> {
    let host = uri.host().filter(|host| !host.is_empty())?;

    let port = uri.port_u16().filter(|port| {
        let default = match uri.scheme() {
            Some(scheme) if *scheme == Scheme::HTTP => Some(80),
            Some(scheme) if *scheme == Scheme::HTTPS => Some(443),
            _ => None,
        };
        default != Some(*port)
    });

    Some(match port {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}
