//! Test relay client.
//!
//! Drives the newline-delimited text protocol over a real TCP stream and
//! can switch to raw byte writes for file-transfer tests.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test client speaking the relay line protocol.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send one protocol line.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send raw bytes with no framing (file payload).
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Half-close the write side, signalling end-of-stream to the server.
    pub async fn shutdown_write(&mut self) -> anyhow::Result<()> {
        self.writer.flush().await?;
        self.writer.get_mut().shutdown().await?;
        Ok(())
    }

    /// Receive one line from the server (5 second default timeout).
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive one line with an explicit timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed by server");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Assert that the server sends nothing for the given duration.
    pub async fn assert_silent(&mut self, dur: Duration) {
        let mut line = String::new();
        match timeout(dur, self.reader.read_line(&mut line)).await {
            Err(_) => {} // timed out with nothing received
            Ok(Ok(0)) => panic!("expected silence, but server closed the connection"),
            Ok(Ok(_)) => panic!("expected silence, but received: {line:?}"),
            Ok(Err(e)) => panic!("expected silence, but read failed: {e}"),
        }
    }

    /// Wait for the server to close the stream.
    pub async fn expect_closed(&mut self, dur: Duration) -> anyhow::Result<()> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n != 0 {
            anyhow::bail!("expected close, but received: {line:?}");
        }
        Ok(())
    }

    /// Join a group and consume the confirmation line.
    pub async fn join(&mut self, group: &str) -> anyhow::Result<()> {
        self.send_line(&format!("/join {group}")).await?;
        let reply = self.recv_line().await?;
        anyhow::ensure!(
            reply == format!("Joined group {group}"),
            "unexpected join reply: {reply:?}"
        );
        Ok(())
    }
}
