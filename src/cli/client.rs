use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use url::Url;

use crate::cli::config::Session;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin JSON client for the TaskFlow API.
///
/// Non-2xx responses become errors carrying the server's `error` message and
/// `details`, if any.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(server).map_err(|e| anyhow::anyhow!("invalid server URL '{}': {}", server, e))?;
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { http, base, token })
    }

    pub fn from_session(session: &Session) -> anyhow::Result<Self> {
        Self::new(&session.server, session.token.clone())
    }

    pub fn url(&self, path: &str) -> anyhow::Result<Url> {
        Ok(self.base.join(path)?)
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn get_query(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn delete(&self, path: &str, body: Option<&Value>) -> anyhow::Result<Value> {
        let mut request = self.request(Method::DELETE, path)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    fn request(&self, method: Method, path: &str) -> anyhow::Result<RequestBuilder> {
        let mut request = self.http.request(method, self.url(path)?);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send(&self, request: RequestBuilder) -> anyhow::Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }

        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"));
        match body.get("details").and_then(Value::as_str) {
            Some(details) => Err(anyhow::anyhow!("{} ({}): {}", message, status.as_u16(), details)),
            None => Err(anyhow::anyhow!("{} ({})", message, status.as_u16())),
        }
    }
}
