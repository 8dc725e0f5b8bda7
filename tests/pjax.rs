//! PJAX behavior through the public router and over a real socket.

use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use pjax::{Request, Response, Router, Server, middleware::Pjax};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>Inbox (3)</title>
    <meta http-equiv="X-PJAX-Version" content="Build-42">
  </head>
  <body>
    <nav>menu</nav>
    <div id="main"><ul><li>one</li><li>two</li></ul></div>
  </body>
</html>"#;

async fn inbox(_req: Request) -> Response {
    Response::html(PAGE)
}

async fn login_redirect(_req: Request) -> Response {
    Response::redirect("/login")
}

fn app() -> Router {
    Router::new()
        .get("/inbox", inbox)
        .get("/private", login_redirect)
        .filter(Pjax::new())
}

fn get(uri: &str, headers: &[(&str, &str)]) -> Request {
    let mut builder = http::Request::get(uri).header("host", "mail.example.com");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Bytes::new()).unwrap().into()
}

#[tokio::test]
async fn full_page_without_pjax_header() {
    let res = app().handle(get("/inbox", &[])).await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body_text(), PAGE);
    assert!(res.header("x-pjax-url").is_none());
    assert!(res.header("x-pjax-version").is_none());
}

#[tokio::test]
async fn fragment_with_pjax_headers() {
    let res = app()
        .handle(get("/inbox?folder=work", &[("X-PJAX", "true"), ("X-PJAX-Container", "#main")]))
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body_text(), "<title>Inbox (3)</title><ul><li>one</li><li>two</li></ul>");
    assert_eq!(res.header("x-pjax-url"), Some("http://mail.example.com/inbox?folder=work"));
    assert_eq!(res.header("x-pjax-version"), Some("build-42"));
}

#[tokio::test]
async fn unknown_container_is_unprocessable() {
    let res = app()
        .handle(get("/inbox", &[("X-PJAX", "true"), ("X-PJAX-Container", "#sidebar")]))
        .await;

    assert_eq!(res.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.header("x-pjax-url").is_none());
}

#[tokio::test]
async fn redirect_is_not_rewritten() {
    let res = app()
        .handle(get("/private", &[("X-PJAX", "true"), ("X-PJAX-Container", "#main")]))
        .await;

    assert_eq!(res.status_code(), StatusCode::FOUND);
    assert_eq!(res.header("location"), Some("/login"));
    assert!(res.header("x-pjax-url").is_none());
}

#[tokio::test]
async fn query_flagged_request_uses_query_container() {
    let res = app().handle(get("/inbox?_pjax=%23main", &[])).await;

    assert_eq!(res.body_text(), "<title>Inbox (3)</title><ul><li>one</li><li>two</li></ul>");
    assert_eq!(res.header("x-pjax-url"), Some("http://mail.example.com/inbox?_pjax=%23main"));
}

#[tokio::test]
async fn served_over_tcp() {
    let port = {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        probe.local_addr().unwrap().port()
    };
    tokio::spawn(Server::bind(format!("127.0.0.1:{port}")).serve(app()));

    let mut stream = None;
    for _ in 0..50 {
        match TcpStream::connect(("127.0.0.1", port)).await {
            Ok(s) => {
                stream = Some(s);
                break;
            }
            Err(_) => tokio::time::sleep(Duration::from_millis(20)).await,
        }
    }
    let mut stream = stream.expect("server did not start");

    stream.write_all(
        format!(
            "GET /inbox HTTP/1.1\r\nHost: 127.0.0.1:{port}\r\nX-PJAX: true\r\n\
             X-PJAX-Container: #main\r\nConnection: close\r\n\r\n"
        ).as_bytes(),
    ).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8(raw).unwrap().to_ascii_lowercase();

    assert!(raw.starts_with("http/1.1 200 ok\r\n"), "{raw}");
    assert!(raw.contains(&format!("x-pjax-url: http://127.0.0.1:{port}/inbox\r\n")), "{raw}");
    assert!(raw.contains("x-pjax-version: build-42\r\n"), "{raw}");
    assert!(raw.ends_with("\r\n\r\n<title>inbox (3)</title><ul><li>one</li><li>two</li></ul>"), "{raw}");
}
