//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

use crate::middleware::pjax::header::{PJAX_QUERY_PARAM, X_PJAX};

/// An incoming HTTP request with its body fully collected.
///
/// Cloning is cheap enough to do once per request: the body is a
/// reference-counted [`Bytes`] and the router only clones when response
/// filters are registered.
#[derive(Clone, Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self { method, uri, headers, body, params: HashMap::new() }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn query(&self) -> Option<&str> { self.uri.query() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Values that are not visible ASCII
    /// read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first percent-decoded value of query parameter `key`.
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Whether this is a PJAX partial-navigation request.
    ///
    /// True when the `X-PJAX` header is present (any value), or when the
    /// `_pjax` query parameter carries a non-empty value other than `"0"`.
    pub fn is_pjax(&self) -> bool {
        if self.headers.contains_key(X_PJAX) {
            return true;
        }
        self.query_param(PJAX_QUERY_PARAM)
            .is_some_and(|v| !v.is_empty() && v != "0")
    }

    /// The fully-qualified URL of this request, query string included.
    ///
    /// Absolute-form URIs (HTTP/2, proxies) are returned as they came.
    /// Otherwise the URL is rebuilt from `X-Forwarded-Proto` /
    /// `X-Forwarded-Host` as set by the fronting proxy, falling back to
    /// `http` and the `Host` header.
    pub fn absolute_url(&self) -> String {
        let path_and_query = self.uri.path_and_query().map_or("/", |pq| pq.as_str());

        if let (Some(scheme), Some(authority)) = (self.uri.scheme_str(), self.uri.authority()) {
            return format!("{scheme}://{authority}{path_and_query}");
        }

        let scheme = self.header("x-forwarded-proto")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("http");
        let host = self.header("x-forwarded-host")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| self.header("host"))
            .unwrap_or("localhost");

        format!("{scheme}://{host}{path_and_query}")
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body)
    }
}
