//! Two-page site served as full pages or PJAX fragments.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example pjax
//!
//! Try:
//!   curl -i http://localhost:3000/about
//!   curl -i http://localhost:3000/about -H 'X-PJAX: true' -H 'X-PJAX-Container: #main'
//!   curl -i 'http://localhost:3000/about?_pjax=%23main'
//!   curl -i http://localhost:3000/about -H 'X-PJAX: true' -H 'X-PJAX-Container: #nope'
//!   curl -i http://localhost:3000/old -H 'X-PJAX: true' -H 'X-PJAX-Container: #main'

use pjax::{Request, Response, Router, Server, middleware::Pjax};
use tracing_subscriber::EnvFilter;

const ASSET_VERSION: &str = "2026-10-18";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Router::new()
        .get("/", home)
        .get("/about", about)
        .get("/old", moved)
        .filter(Pjax::new());

    if let Err(e) = Server::bind("0.0.0.0:3000").serve(app).await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}

async fn home(_req: Request) -> Response {
    Response::html(layout("Home", "<h1>Home</h1><p>Welcome.</p>"))
}

async fn about(_req: Request) -> Response {
    Response::html(layout("About", "<h1>About</h1><p>Pages swap without a reload.</p>"))
}

// Redirects are never rewritten, PJAX or not.
async fn moved(_req: Request) -> Response {
    Response::redirect("/about")
}

fn layout(title: &str, main: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
  <head>
    <title>{title}</title>
    <meta http-equiv="x-pjax-version" content="{ASSET_VERSION}">
  </head>
  <body>
    <nav><a href="/" data-pjax>Home</a> <a href="/about" data-pjax>About</a></nav>
    <main id="main">{main}</main>
  </body>
</html>"#
    )
}
