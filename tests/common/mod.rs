#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use cityinfo_api::auth::DemoUserStore;
use cityinfo_api::config::AppConfig;
use cityinfo_api::database::MemoryCityInfoStore;
use cityinfo_api::services::MailService;
use cityinfo_api::{app, AppState};

/// Keeps every (subject, message) pair so tests can observe notifications
#[derive(Debug, Default)]
pub struct RecordingMailService {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailService {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailService for RecordingMailService {
    fn send(&self, subject: &str, message: &str) {
        self.sent.lock().unwrap().push((subject.to_string(), message.to_string()));
    }
}

/// Router served in-process on a free port over its own freshly seeded store
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub mail: Arc<RecordingMailService>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token for the demo user, obtained through the authentication endpoint
    pub async fn login(&self) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/authentication/authenticate"))
            .json(&serde_json::json!({ "userName": "kevin", "password": "secret" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        Ok(res.text().await?)
    }

    /// Token signed by this server for the demo user living in `city`
    pub fn token_for_city(&self, city: &str) -> String {
        let mut user = DemoUserStore::demo_user("kevin");
        user.city = city.to_string();
        self.state.tokens.issue(&user).expect("test config signs tokens")
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(AppConfig::development()).await
}

pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let mail = Arc::new(RecordingMailService::default());
    let state = AppState::new(config, Arc::new(MemoryCityInfoStore::seeded())).with_mail(mail.clone());

    let router = app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        state,
        mail,
        client: reqwest::Client::new(),
    })
}

/// The real `cityinfo-api` binary, killed on drop
pub struct BinaryServer {
    pub base_url: String,
    child: Child,
}

impl BinaryServer {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let child = Command::new(env!("CARGO_BIN_EXE_cityinfo-api"))
            .env("APP_ENV", "development")
            .env("DATABASE_BACKEND", "memory")
            .env("CITYINFO_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            child,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for BinaryServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
