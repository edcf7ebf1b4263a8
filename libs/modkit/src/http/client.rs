//! Traced HTTP client for outgoing JSON calls
//!
//! Wraps `reqwest::Client`: every request runs inside an `outgoing_http` span,
//! carries a W3C `traceparent` header and records the response status.

use std::time::Duration;

use http::{HeaderValue, Method};
use serde::Serialize;
use tracing::{field, Instrument, Level};

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

/// A traced HTTP client that stamps every outgoing request with a trace context.
#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    /// Create a new TracedClient wrapping the provided reqwest::Client
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Build a client with an optional whole-request timeout.
    /// `None` leaves requests unbounded.
    pub fn with_timeout(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self::new(builder.build()?))
    }

    /// Execute a built request inside an `outgoing_http` span.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO,
            "outgoing_http",
            http.method = %req.method(),
            http.url = %redacted_url(req.url()),
            http.status_code = field::Empty,
            error = field::Empty,
            otel.kind = "client",
        );

        if let Ok(value) = HeaderValue::from_str(&traceparent()) {
            req.headers_mut().insert(TRACEPARENT, value);
        }

        let response = self.inner.execute(req).instrument(span.clone()).await;
        match &response {
            Ok(resp) => {
                span.record("http.status_code", resp.status().as_u16());
                if resp.status().is_client_error() || resp.status().is_server_error() {
                    span.record("error", true);
                }
            }
            Err(_) => {
                span.record("error", true);
            }
        }
        response
    }

    /// GET with URL-encoded query parameters.
    pub async fn get_with_query<Q>(&self, url: &str, query: &Q) -> reqwest::Result<reqwest::Response>
    where
        Q: Serialize + ?Sized,
    {
        let req = self.inner.get(url).query(query).build()?;
        self.execute(req).await
    }

    /// Send a JSON body with an arbitrary method.
    pub async fn send_json<B>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> reqwest::Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let req = self.inner.request(method, url).json(body).build()?;
        self.execute(req).await
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

/// URL without its query string. Query parameters may carry API keys.
fn redacted_url(url: &reqwest::Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

/// Fresh sampled `traceparent` value: `00-<trace id>-<span id>-01`.
fn traceparent() -> String {
    let trace_id = rand::random::<u128>();
    let span_id = rand::random::<u64>();
    format!("00-{trace_id:032x}-{span_id:016x}-01")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    /// Trace id segment of a `traceparent` value, if well formed.
    fn parse_trace_id(traceparent: &str) -> Option<&str> {
        let mut parts = traceparent.split('-');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("00"), Some(trace_id), Some(_), Some(_)) if trace_id.len() == 32 => Some(trace_id),
            _ => None,
        }
    }

    #[test]
    fn traceparent_is_well_formed() {
        let header = traceparent();
        assert!(header.starts_with("00-"));
        assert!(header.ends_with("-01"));
        assert_eq!(header.matches('-').count(), 3);
        assert_eq!(parse_trace_id(&header).map(str::len), Some(32));
    }

    #[test]
    fn redacted_url_drops_query() {
        let url = reqwest::Url::parse("https://api.example.com/3/search/movie?api_key=s3cret&query=up")
            .unwrap();
        assert_eq!(redacted_url(&url), "https://api.example.com/3/search/movie");
    }

    #[test]
    fn parse_trace_id_rejects_garbage() {
        assert!(parse_trace_id("invalid").is_none());
        assert_eq!(
            parse_trace_id("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
            Some("4bf92f3577b34da6a3ce929d0e0e4736")
        );
    }

    #[tokio::test]
    async fn get_with_query_injects_trace_header() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/check_like.php")
                .query_param("review_id", "7")
                .header_exists("traceparent");
            then.status(200).json_body(json!({ "isLiked": true }));
        });

        let client = TracedClient::default();
        let url = format!("{}/check_like.php", server.base_url());
        let resp = client
            .get_with_query(&url, &[("review_id", "7")])
            .await
            .unwrap();

        assert!(resp.status().is_success());
        m.assert();
    }

    #[tokio::test]
    async fn send_json_posts_body() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(PUT)
                .path("/users.php")
                .json_body(json!({ "id": 3, "status": "active" }));
            then.status(200).json_body(json!({ "success": true }));
        });

        let client = TracedClient::with_timeout(None).unwrap();
        let url = format!("{}/users.php", server.base_url());
        let resp = client
            .send_json(http::Method::PUT, &url, &json!({ "id": 3, "status": "active" }))
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 200);
        m.assert();
    }
}
