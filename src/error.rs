//! Error types.
//!
//! Two kinds of failure exist in this crate and they never mix:
//!
//! - [`Error`] surfaces infrastructure failures: a bad bind address, a port
//!   already in use, a failed `accept`. These end [`Server::serve`](crate::Server::serve).
//! - [`Abort`] ends the processing of one request with an HTTP status. A
//!   response filter returns it when the response cannot be produced (the PJAX
//!   filter aborts with `422` when the requested container is missing).

use http::StatusCode;

use crate::response::{IntoResponse, Response};

/// The error type returned by the server's fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid socket address `{addr}`")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminates the response pipeline with an HTTP error status.
///
/// The router renders an `Abort` as a plain-text response carrying `status`
/// and `reason`; no further filters run after it.
#[derive(Debug, thiserror::Error)]
#[error("{status}: {reason}")]
pub struct Abort {
    status: StatusCode,
    reason: String,
}

impl Abort {
    pub fn new(status: StatusCode, reason: impl Into<String>) -> Self {
        Self { status, reason: reason.into() }
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn reason(&self) -> &str { &self.reason }
}

impl IntoResponse for Abort {
    fn into_response(self) -> Response {
        Response::builder()
            .status(self.status)
            .text(self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_renders_status_and_reason() {
        let res = Abort::new(StatusCode::UNPROCESSABLE_ENTITY, "no container").into_response();

        assert_eq!(res.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(res.body_text(), "no container");
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn invalid_address_names_the_input() {
        let source = "nope".parse::<std::net::SocketAddr>().unwrap_err();
        let err = Error::InvalidAddress { addr: "nope".to_owned(), source };

        assert_eq!(err.to_string(), "invalid socket address `nope`");
    }
}
