//! Test bot process management.
//!
//! Runs the built `notifybot` binary with a generated config file and
//! collects its log output.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

pub struct TestBot {
    child: Child,
    logs: mpsc::Receiver<String>,
    _dir: TempDir,
}

impl TestBot {
    /// Spawn the bot with `config` written to a temporary `config.toml`.
    pub fn spawn(config: &str) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, config)?;

        let mut child = Command::new(env!("CARGO_BIN_EXE_notifybot"))
            .arg(&config_path)
            .env("RUST_LOG", "info")
            .env("NO_COLOR", "1")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let (tx, logs) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            std::thread::spawn(move || {
                for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
        }

        Ok(Self {
            child,
            logs,
            _dir: dir,
        })
    }

    /// Config for a bot connecting to `127.0.0.1:<port>`.
    pub fn config(port: u16, channels: &[&str], peers: &[&str]) -> String {
        let list = |items: &[&str]| {
            items
                .iter()
                .map(|i| format!("{:?}", i))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            r#"
[server]
host = "127.0.0.1"
port = {}

[bot]
nick = "notifybot"
channels = [{}]
peers = [{}]
poll_interval = "1h"
"#,
            port,
            list(channels),
            list(peers)
        )
    }

    /// Wait until a log line containing `needle` shows up.
    pub fn wait_for_log(&self, needle: &str, within: Duration) -> anyhow::Result<String> {
        let deadline = Instant::now() + within;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.logs.recv_timeout(left) {
                Ok(line) if line.contains(needle) => return Ok(line),
                Ok(_) => continue,
                Err(_) => anyhow::bail!("no log line containing {:?}", needle),
            }
        }
    }

    /// Wait for the process to exit on its own.
    pub fn wait_exit(&mut self, within: Duration) -> anyhow::Result<ExitStatus> {
        let deadline = Instant::now() + within;
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                anyhow::bail!("bot still running after {:?}", within);
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Drop for TestBot {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
