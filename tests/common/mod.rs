use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use axum::{routing::post, Form, Json, Router};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Secret the spawned server is configured with, and the one token the stub
/// oracle accepts for it.
pub const TEST_SECRET: &str = "stub-secret";
pub const VALID_TOKEN: &str = "valid-token";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

#[derive(Deserialize)]
struct SiteverifyForm {
    secret: String,
    response: String,
}

/// Local stand-in for the remote verification service. Accepts exactly the
/// (secret, token) pair the tests mint; everything else is denied.
fn spawn_stub_oracle() -> Result<u16> {
    let port = portpicker::pick_unused_port().context("failed to pick free port for stub oracle")?;
    let listener = std::net::TcpListener::bind(("127.0.0.1", port))?;
    listener.set_nonblocking(true)?;

    let app = Router::new().route(
        "/siteverify",
        post(|Form(form): Form<SiteverifyForm>| async move {
            let success = form.secret == TEST_SECRET && form.response == VALID_TOKEN;
            Json(json!({ "success": success }))
        }),
    );

    tokio::spawn(async move {
        let listener = tokio::net::TcpListener::from_std(listener).expect("stub oracle listener");
        axum::serve(listener, app).await.expect("stub oracle");
    });

    Ok(port)
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let oracle_port = spawn_stub_oracle()?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/potluck-api");
        cmd.env("POTLUCK_PORT", port.to_string())
            .env("RECAPTCHA_SECRET_KEY", TEST_SECRET)
            .env(
                "RECAPTCHA_VERIFY_URL",
                format!("http://127.0.0.1:{}/siteverify", oracle_port),
            )
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    if resp.status() == StatusCode::OK {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Unique per-run marker so tests sharing a database never collide.
pub fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}
