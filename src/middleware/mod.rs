//! Middleware layer.
//!
//! Response filters run after the handler, in the order they were registered
//! with [`Router::filter`](crate::Router::filter). Each one receives the
//! request that produced the response and the response itself, and either
//! hands back a (possibly rewritten) response or aborts the pipeline with an
//! HTTP status.
//!
//! ```rust,no_run
//! use pjax::{Abort, Request, Response, Router, middleware::Pjax};
//!
//! # async fn page(_: Request) -> Response { Response::html("") }
//! let app = Router::new()
//!     .get("/", page)
//!     .filter(Pjax::new())
//!     .filter(|_req: &Request, mut res: Response| {
//!         res.headers_mut().insert("x-frame-options", http::HeaderValue::from_static("DENY"));
//!         Ok::<_, Abort>(res)
//!     });
//! ```
//!
//! Built-in middleware:
//! - [`Pjax`] — rewrites full pages into PJAX fragments

pub mod pjax;

pub use pjax::{Pjax, PjaxError};

use crate::error::Abort;
use crate::request::Request;
use crate::response::Response;

/// A hook invoked on every response just before it is sent.
///
/// Implementations must not keep per-request state in `self`: one filter
/// value serves all concurrent requests.
pub trait ResponseFilter: Send + Sync + 'static {
    fn on_response(&self, req: &Request, res: Response) -> Result<Response, Abort>;
}

impl<F> ResponseFilter for F
where
    F: Fn(&Request, Response) -> Result<Response, Abort> + Send + Sync + 'static,
{
    fn on_response(&self, req: &Request, res: Response) -> Result<Response, Abort> {
        self(req, res)
    }
}
