//! PJAX partial-navigation responses.
//!
//! A PJAX client (jquery-pjax and friends) fetches the next page with an
//! `X-PJAX` header and names the element it is about to replace in
//! `X-PJAX-Container`. Handlers keep rendering full pages; [`Pjax`] cuts the
//! page down to what the client swaps in:
//!
//! ```text
//! <title>…</title><inner markup of the container>
//! ```
//!
//! and annotates the response with:
//!
//! | Header | Value |
//! |---|---|
//! | `X-PJAX-URL` | absolute URL of the request, so the client can fix its location bar |
//! | `x-pjax-version` | `content` of `<meta http-equiv="x-pjax-version">`, lower-cased, when present |
//!
//! A container selector that matches nothing aborts with
//! `422 Unprocessable Entity`; the client then falls back to a full page load.
//! Redirects and non-PJAX requests pass through untouched.

use bytes::Bytes;
use http::{HeaderName, StatusCode};
use tracing::{debug, warn};

use crate::error::Abort;
use crate::html::{Document, SelectorError};
use crate::middleware::ResponseFilter;
use crate::request::Request;
use crate::response::Response;

/// Header and query names of the PJAX wire protocol.
pub mod header {
    use http::HeaderName;

    /// Request header flagging a PJAX request. Presence is enough.
    pub const X_PJAX: HeaderName = HeaderName::from_static("x-pjax");
    /// Request header carrying the CSS selector of the container to extract.
    pub const X_PJAX_CONTAINER: HeaderName = HeaderName::from_static("x-pjax-container");
    /// Response header carrying the absolute request URL.
    pub const X_PJAX_URL: HeaderName = HeaderName::from_static("x-pjax-url");
    /// Response header carrying the page's asset version.
    pub const X_PJAX_VERSION: HeaderName = HeaderName::from_static("x-pjax-version");
    /// Cache-busting query parameter; its value is the container selector.
    pub const PJAX_QUERY_PARAM: &str = "_pjax";
}

const TITLE_SELECTOR: &str = "head > title";
const VERSION_SELECTOR: &str = r#"head > meta[http-equiv="x-pjax-version"]"#;

/// Why a PJAX response could not be produced. Every variant is the client's
/// to fix and maps to `422`.
#[derive(Debug, thiserror::Error)]
pub enum PjaxError {
    #[error("no PJAX container selector in request")]
    MissingContainer,

    #[error("PJAX container `{selector}` not found in response")]
    ContainerNotFound { selector: String },

    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),
}

impl From<PjaxError> for Abort {
    fn from(e: PjaxError) -> Self {
        Abort::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    }
}

/// Response filter that turns full HTML pages into PJAX fragments.
///
/// Stateless: register one instance on the router and it serves every
/// request. The parsed page lives only for the duration of one
/// [`on_response`](ResponseFilter::on_response) call.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pjax;

impl Pjax {
    pub fn new() -> Self { Self }
}

impl ResponseFilter for Pjax {
    fn on_response(&self, req: &Request, res: Response) -> Result<Response, Abort> {
        if !req.is_pjax() || res.is_redirect() {
            return Ok(res);
        }

        Transform::new(req, res).run().map_err(|e| {
            warn!(path = req.path(), error = %e, "pjax response aborted");
            Abort::from(e)
        })
    }
}

/// One filter invocation: the request, the response being rewritten, and the
/// page parsed from the response body, built on first use.
struct Transform<'r> {
    req: &'r Request,
    res: Response,
    page: Bytes,
    document: Option<Document>,
}

impl<'r> Transform<'r> {
    fn new(req: &'r Request, res: Response) -> Self {
        let page = res.body().clone();
        Self { req, res, page, document: None }
    }

    fn run(mut self) -> Result<Response, PjaxError> {
        let selector = self.container_selector()?;
        self.filter_body(&selector)?;
        self.set_url_header();
        self.set_version_header();
        Ok(self.res)
    }

    /// The selector from `X-PJAX-Container`, falling back to the `_pjax`
    /// query value sent by clients that cannot set headers.
    fn container_selector(&self) -> Result<String, PjaxError> {
        self.req.header(header::X_PJAX_CONTAINER.as_str())
            .map(str::to_owned)
            .or_else(|| self.req.query_param(header::PJAX_QUERY_PARAM))
            .filter(|s| !s.trim().is_empty())
            .ok_or(PjaxError::MissingContainer)
    }

    /// The page as it was handed to the filter. Parsed once.
    fn document(&mut self) -> &Document {
        self.document.get_or_insert_with(|| Document::parse(&String::from_utf8_lossy(&self.page)))
    }

    fn filter_body(&mut self, selector: &str) -> Result<(), PjaxError> {
        let title = self.title()?;
        let fragment = self.container(selector)?;

        debug!(selector, title = !title.is_empty(), bytes = fragment.len(), "pjax fragment extracted");
        self.res.set_body(title + &fragment);
        Ok(())
    }

    fn title(&mut self) -> Result<String, PjaxError> {
        let title = self.document()
            .select_first(TITLE_SELECTOR)?
            .map(|el| format!("<title>{}</title>", el.inner_html()))
            .unwrap_or_default();
        Ok(title)
    }

    fn container(&mut self, selector: &str) -> Result<String, PjaxError> {
        self.document()
            .select_first(selector)?
            .map(|el| el.inner_html())
            .ok_or_else(|| PjaxError::ContainerNotFound { selector: selector.to_owned() })
    }

    fn set_url_header(&mut self) {
        let url = self.req.absolute_url();
        set_header(&mut self.res, header::X_PJAX_URL, &url);
    }

    /// Looks the version up in an ASCII-lower-cased copy of the page, so the
    /// tag, attribute names and the value itself all compare lower-case.
    fn set_version_header(&mut self) {
        let lowered = Document::parse(&String::from_utf8_lossy(&self.page).to_ascii_lowercase());

        let version = match lowered.select_first(VERSION_SELECTOR) {
            Ok(Some(meta)) => meta.attr("content").map(str::to_owned),
            _ => None,
        };

        if let Some(version) = version {
            set_header(&mut self.res, header::X_PJAX_VERSION, &version);
        }
    }
}

fn set_header(res: &mut Response, name: HeaderName, value: &str) {
    if let Err(e) = res.set_header(name.clone(), value) {
        warn!(header = %name, error = %e, "skipping unrepresentable pjax header");
    }
}
