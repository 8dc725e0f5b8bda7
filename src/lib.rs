//! # pjax
//!
//! Server-side PJAX for a minimal hyper-based HTTP framework.
//!
//! PJAX clients navigate by fetching the next page over XHR and swapping one
//! container element in place. Handlers here keep rendering complete pages;
//! the [`Pjax`](middleware::Pjax) response filter cuts each page down to the
//! page title plus the requested container's contents whenever the request
//! carries the `X-PJAX` header.
//!
//! What the framework covers:
//!
//! - Radix-tree routing via [`matchit`]
//! - A response-filter pipeline ([`middleware`])
//! - HTTP/1.1 and HTTP/2 through hyper, graceful shutdown on SIGTERM / Ctrl-C
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pjax::{Request, Response, Router, Server, middleware::Pjax};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .get("/", home)
//!         .filter(Pjax::new());
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn home(_req: Request) -> Response {
//!     Response::html(r#"<html><head><title>Home</title></head>
//!         <body><nav>…</nav><main id="main">Welcome</main></body></html>"#)
//! }
//! ```
//!
//! A request with `X-PJAX: true` and `X-PJAX-Container: #main` receives
//! `<title>Home</title>Welcome`.

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod html;
pub mod middleware;

pub use error::{Abort, Error};
pub use handler::Handler;
pub use middleware::ResponseFilter;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder, ResponseKind};
pub use router::Router;
pub use server::Server;
