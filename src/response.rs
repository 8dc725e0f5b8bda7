//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`] and return it. Response filters receive it
//! by value, may rewrite its body and headers, and pass it on. Redirects are
//! tagged with [`ResponseKind::Redirect`] so filters can leave them alone
//! without sniffing status codes.

use std::borrow::Cow;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use http_body_util::Full;
use tracing::warn;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`ResponseBuilder::bytes`].
pub enum ContentType {
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream
    Text,         // text/plain; charset=utf-8
    Xml,          // application/xml
}

impl ContentType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

// ── ResponseKind ──────────────────────────────────────────────────────────────

/// Distinguishes ordinary responses from redirects.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ResponseKind {
    #[default]
    Normal,
    Redirect,
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use pjax::Response;
///
/// Response::html("<p>hello</p>");
/// Response::text("hello");
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::redirect("/login");
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use http::StatusCode;
/// use pjax::{ContentType, Response};
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header("location", "/users/42")
///     .json(br#"{"id":42}"#.to_vec());
///
/// Response::builder()
///     .status(StatusCode::SEE_OTHER)
///     .redirect("/users/42");
///
/// Response::builder()
///     .bytes(ContentType::Xml, b"<ok/>".to_vec());
/// ```
#[derive(Clone, Debug)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) kind: ResponseKind,
}

impl Response {
    /// `200 OK` — `text/html; charset=utf-8`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::builder().html(body)
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// `200 OK` — `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().json(body)
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self::builder().status(code).no_body()
    }

    /// `302 Found` pointing at `location`.
    pub fn redirect(location: &str) -> Self {
        Self::builder().status(StatusCode::FOUND).redirect(location)
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: HeaderMap::new(), status: StatusCode::OK }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn kind(&self) -> ResponseKind { self.kind }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    pub fn is_redirect(&self) -> bool {
        self.kind == ResponseKind::Redirect
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The body as text. Invalid UTF-8 sequences are replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Replaces every value of `name` with `value`.
    pub fn set_header(
        &mut self,
        name: HeaderName,
        value: &str,
    ) -> Result<(), http::header::InvalidHeaderValue> {
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(())
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: HeaderMap,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    /// Appends a header. Names or values that are not valid HTTP are
    /// dropped with a warning.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => warn!(header = name, "dropping invalid response header"),
        }
        self
    }

    pub fn html(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Html, body.into().into_bytes())
    }

    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Text, body.into().into_bytes())
    }

    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish(ContentType::Json, body)
    }

    pub fn bytes(self, content_type: ContentType, body: Vec<u8>) -> Response {
        self.finish(content_type, body)
    }

    /// Terminate with no body (e.g. `204 No Content`).
    pub fn no_body(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: Bytes::new(),
            kind: ResponseKind::Normal,
        }
    }

    /// Terminate as a redirect to `location`. A non-3xx status set earlier
    /// is replaced with `302 Found`.
    pub fn redirect(self, location: &str) -> Response {
        let status = if self.status.is_redirection() { self.status } else { StatusCode::FOUND };
        let mut res = self.status(status).header(LOCATION.as_str(), location).no_body();
        res.kind = ResponseKind::Redirect;
        res
    }

    fn finish(mut self, content_type: ContentType, body: Vec<u8>) -> Response {
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
        Response {
            status: self.status,
            headers: self.headers,
            body: Bytes::from(body),
            kind: ResponseKind::Normal,
        }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a status directly from a handler: `return StatusCode::NOT_FOUND`
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_shortcut_sets_content_type() {
        let res = Response::html("<p>hi</p>");

        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(res.body_text(), "<p>hi</p>");
        assert_eq!(res.kind(), ResponseKind::Normal);
    }

    #[test]
    fn redirect_is_tagged() {
        let res = Response::redirect("/login");

        assert!(res.is_redirect());
        assert_eq!(res.status_code(), StatusCode::FOUND);
        assert_eq!(res.header("location"), Some("/login"));
        assert!(res.body().is_empty());
    }

    #[test]
    fn builder_redirect_keeps_3xx_status() {
        let res = Response::builder().status(StatusCode::SEE_OTHER).redirect("/done");
        assert_eq!(res.status_code(), StatusCode::SEE_OTHER);

        let res = Response::builder().status(StatusCode::OK).redirect("/done");
        assert_eq!(res.status_code(), StatusCode::FOUND);
    }

    #[test]
    fn builder_drops_invalid_headers() {
        let res = Response::builder()
            .header("x-ok", "yes")
            .header("bad header", "value")
            .header("x-bad-value", "line\nbreak")
            .no_body();

        assert_eq!(res.headers().len(), 1);
        assert_eq!(res.header("x-ok"), Some("yes"));
    }

    #[test]
    fn set_header_replaces_existing_value() {
        let mut res = Response::builder().header("x-pjax-url", "old").no_body();
        res.set_header(HeaderName::from_static("x-pjax-url"), "new").unwrap();

        assert_eq!(res.headers().get_all("x-pjax-url").iter().count(), 1);
        assert_eq!(res.header("X-PJAX-URL"), Some("new"));
    }

    #[test]
    fn body_text_replaces_invalid_utf8() {
        let res = Response::builder().bytes(ContentType::OctetStream, vec![b'a', 0xff]);
        assert_eq!(res.body_text(), "a\u{fffd}");
    }

    #[test]
    fn into_http_keeps_status_and_headers() {
        let res = Response::builder()
            .status(StatusCode::CREATED)
            .header("x-id", "7")
            .text("made")
            .into_http();

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()["x-id"], "7");
    }
}
