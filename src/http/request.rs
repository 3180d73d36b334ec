//! Inbound request representation and request-id generation.
//!
//! # Responsibilities
//! - Carry the routing-relevant slice of an inbound request (path + named
//!   parameters) into the dispatch core
//! - Generate unique request IDs for tracing correlation
//!
//! # Design Decisions
//! - Transport-neutral: handlers never see the raw wire request
//! - Request ID added as early as possible so every log line carries it

use std::collections::HashMap;

use axum::http::{HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header the request ID travels under.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The request object injected into handler methods.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    path: String,
    params: HashMap<String, String>,
}

impl HttpRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: HashMap::new(),
        }
    }

    /// Attach a named parameter; later values for the same name win.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Build from an inbound URI, decoding query pairs into named parameters.
    pub fn from_uri(uri: &Uri) -> Self {
        let mut request = Self::new(uri.path());
        if let Some(query) = uri.query() {
            for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
                request.params.insert(name.into_owned(), value.into_owned());
            }
        }
        request
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// UUID-v4 request-id source for the request-id middleware layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_become_named_parameters() {
        let uri: Uri = "http://localhost/user/find?name=ada&team=analytics"
            .parse()
            .unwrap();
        let request = HttpRequest::from_uri(&uri);

        assert_eq!(request.path(), "/user/find");
        assert_eq!(request.param("name"), Some("ada"));
        assert_eq!(request.param("team"), Some("analytics"));
        assert_eq!(request.param("absent"), None);
    }

    #[test]
    fn percent_encoded_values_are_decoded() {
        let uri: Uri = "http://localhost/echo?msg=hello%20world".parse().unwrap();
        let request = HttpRequest::from_uri(&uri);

        assert_eq!(request.param("msg"), Some("hello world"));
    }

    #[test]
    fn uri_without_query_has_no_parameters() {
        let uri: Uri = "http://localhost/user/list".parse().unwrap();
        let request = HttpRequest::from_uri(&uri);

        assert_eq!(request.path(), "/user/list");
        assert_eq!(request.params().count(), 0);
    }
}
