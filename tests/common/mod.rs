#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use taskflow_api::config::AppConfig;
use taskflow_api::state::AppState;
use taskflow_api::store::MemoryStore;

/// In-process server with its own freshly seeded store.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let mut config = AppConfig::development();
        config.security.bcrypt_cost = 4;
        config.api.enable_request_logging = false;
        Self::spawn_with(config).await
    }

    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = MemoryStore::new(config.security.bcrypt_cost);
        store.seed_demo_data().await?;
        let state = AppState::new(config, Arc::new(store))?;

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port)))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, taskflow_api::app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn request(&self, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let res = request.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.context("response body was not JSON")?;
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Log in and return the session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let (status, body) = self
            .post("/api/auth/login", None, json!({ "username": username, "password": password }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);
        body["token"].as_str().map(str::to_string).context("login response had no token")
    }

    /// Register a new account and return its session token.
    pub async fn register(&self, username: &str, password: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": password,
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);
        body["token"].as_str().map(str::to_string).context("register response had no token")
    }

    /// Create a task and return its id.
    pub async fn create_task(&self, token: Option<&str>, body: Value) -> Result<String> {
        let (status, body) = self.post("/api/tasks", token, body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create task failed: {} {}", status, body);
        body["task"]["id"].as_str().map(str::to_string).context("task response had no id")
    }
}
