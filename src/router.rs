//! Radix-tree request router and response-filter pipeline.
//!
//! One tree per HTTP method, O(path-length) lookup. After the handler runs,
//! the response passes through every registered [`ResponseFilter`] in order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::{debug, warn};

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::ResponseFilter;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Registration methods return `self` so calls chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    filters: Vec<Box<dyn ResponseFilter>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), filters: Vec::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use pjax::{Request, Response, Router};
    /// # use http::Method;
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn delete_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::DELETE, "/users/{id}", delete_user)
    ///     .on(Method::GET,    "/users/{id}", get_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_insert_with(MatchitRouter::new)
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    /// Append a response filter. Filters run in registration order.
    pub fn filter(mut self, filter: impl ResponseFilter) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Routes one request and produces one response: handler first, then
    /// every filter. An [`Abort`](crate::Abort) from a filter becomes the
    /// response and skips the filters after it.
    pub async fn handle(&self, mut req: Request) -> Response {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_owned();

        let Some((handler, params)) = self.lookup(&method, &path) else {
            debug!(%method, %path, status = 404, "no route");
            return StatusCode::NOT_FOUND.into_response();
        };
        req.params = params;

        let response = if self.filters.is_empty() {
            handler.call(req).await
        } else {
            let res = handler.call(req.clone()).await;
            self.apply_filters(&req, res)
        };

        debug!(
            %method,
            %path,
            status = response.status_code().as_u16(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "request handled"
        );
        response
    }

    fn apply_filters(&self, req: &Request, mut res: Response) -> Response {
        for filter in &self.filters {
            res = match filter.on_response(req, res) {
                Ok(res) => res,
                Err(abort) => {
                    warn!(path = req.path(), status = abort.status().as_u16(), "response filter aborted");
                    return abort.into_response();
                }
            };
        }
        res
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::error::Abort;

    fn request(method: Method, uri: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::new())
            .unwrap()
            .into()
    }

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or("none").to_owned()
    }

    #[tokio::test]
    async fn routes_by_method_and_path() {
        let app = Router::new().get("/users/{id}", echo_id);

        let res = app.handle(request(Method::GET, "/users/42")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body_text(), "42");

        let res = app.handle(request(Method::POST, "/users/42")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);

        let res = app.handle(request(Method::GET, "/nowhere")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn filters_run_in_registration_order() {
        let app = Router::new()
            .get("/", |_req: Request| async { "a" })
            .filter(|_req: &Request, mut res: Response| {
                let body = format!("{}b", res.body_text());
                res.set_body(body);
                Ok::<_, Abort>(res)
            })
            .filter(|_req: &Request, mut res: Response| {
                let body = format!("{}c", res.body_text());
                res.set_body(body);
                Ok::<_, Abort>(res)
            });

        let res = app.handle(request(Method::GET, "/")).await;
        assert_eq!(res.body_text(), "abc");
    }

    #[tokio::test]
    async fn filters_see_route_params() {
        let app = Router::new()
            .get("/items/{id}", |_req: Request| async { "item" })
            .filter(|req: &Request, mut res: Response| {
                let id = req.param("id").unwrap_or_default().to_owned();
                res.set_body(id);
                Ok::<_, Abort>(res)
            });

        let res = app.handle(request(Method::GET, "/items/9")).await;
        assert_eq!(res.body_text(), "9");
    }

    #[tokio::test]
    async fn abort_short_circuits_remaining_filters() {
        let app = Router::new()
            .get("/", |_req: Request| async { "page" })
            .filter(|_req: &Request, _res: Response| {
                Err::<Response, _>(Abort::new(StatusCode::UNPROCESSABLE_ENTITY, "stop"))
            })
            .filter(|_req: &Request, _res: Response| -> Result<Response, Abort> {
                panic!("filter after an abort must not run")
            });

        let res = app.handle(request(Method::GET, "/")).await;
        assert_eq!(res.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(res.body_text(), "stop");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::new()
            .get("/a/{id}", echo_id)
            .get("/a/{id}", echo_id);
    }
}
