//! HTTP transport.
//!
//! The [`Transport`] trait is the seam between gateways and the network: it
//! takes an [`ApiRequest`] and returns the status plus parsed JSON body,
//! whatever that status is. Interpreting the body is the gateway's job.
//!
//! [`HttpTransport`] attaches the bearer token from the shared
//! [`AuthService`]. A 401 on a request that carried a token triggers one
//! refresh and exactly one retry of the original request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use taskhub_auth::AuthService;
use tracing::{debug, warn};

use crate::errors::TransportError;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// One backend call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Method.
    pub method: HttpMethod,
    /// Path starting with `/`, e.g. `/tasks/42`.
    pub path: String,
    /// Query parameters in send order.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    /// GET `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, None)
    }

    /// POST `body` to `path`.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path, Some(body))
    }

    /// PUT `body` to `path`.
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path, Some(body))
    }

    /// PATCH `body` to `path`.
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, path, Some(body))
    }

    /// DELETE `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path, None)
    }

    /// Append query parameters.
    #[must_use]
    pub fn with_query<K: Into<String>>(mut self, pairs: impl IntoIterator<Item = (K, String)>) -> Self {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Value of query parameter `key`, if present.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and parsed body of one response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; `Null` when empty or not JSON.
    pub body: Value,
}

impl RawResponse {
    /// Build a response.
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends [`ApiRequest`]s.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return whatever the backend answered.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError>;
}

/// `reqwest` transport with bearer auth and refresh-on-401.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<AuthService>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Transport over an existing client.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, auth: Arc<AuthService>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Build a `reqwest` client with the given per-request timeout.
    pub fn build_client(timeout: Duration) -> Result<reqwest::Client, TransportError> {
        Ok(reqwest::Client::builder().timeout(timeout).build()?)
    }

    /// The shared auth service.
    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .query(&request.query);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|_| {
                debug!(status, "non-JSON response body");
                Value::String(text)
            })
        };
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip_all, fields(method = request.method.as_str(), path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let token = self.auth.access_token();
        let response = self.dispatch(&request, token.as_deref()).await?;
        if response.status != 401 {
            return Ok(response);
        }
        let Some(rejected) = token else {
            return Ok(response);
        };

        warn!("request unauthorized, refreshing session");
        let fresh = self.auth.refresh_after_unauthorized(&rejected).await?;
        self.dispatch(&request, Some(&fresh)).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use taskhub_auth::{AuthError, MemorySessionStore, Session, SessionEvent};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer, session: Option<Session>) -> HttpTransport {
        let store = match session {
            Some(s) => MemorySessionStore::with_session(s),
            None => MemorySessionStore::new(),
        };
        let base = format!("{}/api", server.uri());
        let auth = Arc::new(AuthService::new(
            reqwest::Client::new(),
            base.clone(),
            Arc::new(store),
        ));
        HttpTransport::new(reqwest::Client::new(), base, auth)
    }

    fn session(access: &str, refresh: Option<&str>) -> Session {
        Session {
            access_token: access.into(),
            refresh_token: refresh.map(String::from),
            user: None,
        }
    }

    #[test]
    fn request_builders() {
        let req = ApiRequest::get("/tasks").with_query([("search", "x".to_string())]);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.query_value("search"), Some("x"));
        assert!(req.body.is_none());
        assert_eq!(ApiRequest::delete("/tasks/1").method.as_str(), "DELETE");
    }

    #[tokio::test]
    async fn attaches_bearer_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .and(query_param("search", "homepage"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let t = transport(&server, Some(session("tok", None)));
        let resp = t
            .send(ApiRequest::get("/tasks").with_query([("search", "homepage".to_string())]))
            .await
            .unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.body, json!({"success": true}));
    }

    #[tokio::test]
    async fn sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/tasks/1"))
            .and(body_json(json!({"status": "completed"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let t = transport(&server, Some(session("tok", None)));
        let resp = t
            .send(ApiRequest::put("/tasks/1", json!({"status": "completed"})))
            .await
            .unwrap();
        assert_eq!(resp.body, Value::Null);
    }

    #[tokio::test]
    async fn non_success_status_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "nope"})))
            .mount(&server)
            .await;

        let t = transport(&server, None);
        let resp = t.send(ApiRequest::get("/projects/9")).await.unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body["message"], "nope");
    }

    #[tokio::test]
    async fn unauthorized_refreshes_and_retries_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "new"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let t = transport(&server, Some(session("old", Some("r"))));
        let resp = t.send(ApiRequest::get("/tasks")).await.unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(t.auth().access_token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn retry_is_not_repeated_on_second_401() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "new"})))
            .expect(1)
            .mount(&server)
            .await;

        let t = transport(&server, Some(session("old", Some("r"))));
        let resp = t.send(ApiRequest::get("/tasks")).await.unwrap();
        assert_eq!(resp.status, 401);
    }

    #[tokio::test]
    async fn failed_refresh_expires_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let t = transport(&server, Some(session("old", Some("r"))));
        let mut events = t.auth().subscribe();
        let err = t.send(ApiRequest::get("/tasks")).await.unwrap_err();
        assert_matches!(err, TransportError::Auth(AuthError::SessionExpired(_)));
        assert!(!t.auth().is_authenticated());
        assert_matches!(events.recv().await, Ok(SessionEvent::Expired));
    }

    #[tokio::test]
    async fn unauthorized_without_session_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let t = transport(&server, None);
        let resp = t.send(ApiRequest::get("/tasks")).await.unwrap();
        assert_eq!(resp.status, 401);
    }
}
