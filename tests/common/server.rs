//! Test server management.
//!
//! Spawns and manages relayd instances for integration testing.

use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    data_dir: TempDir,
}

impl TestServer {
    /// Spawn a new test server on an ephemeral port.
    pub async fn spawn() -> anyhow::Result<Self> {
        // Grab a free port, then release it for the daemon to rebind.
        let probe = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = probe.local_addr()?.port();
        drop(probe);

        let data_dir = tempfile::tempdir()?;
        let files_dir = data_dir.path().join("files");

        let config_path = data_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
listen = "127.0.0.1:{}"

[files]
dir = "{}"
"#,
            port,
            files_dir.display()
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_relayd"))
            .arg(&config_path)
            .spawn()?;

        let server = Self {
            child,
            port,
            data_dir,
        };

        server.wait_until_ready().await?;

        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..30 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 3 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Directory where `/file` payloads land.
    pub fn files_dir(&self) -> PathBuf {
        self.data_dir.path().join("files")
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
