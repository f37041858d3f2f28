//! Strength backend: a UCI engine subprocess
//!
//! The session only sees the [`MoveSource`] capability; [`UciEngine`] is the
//! production implementation driving a Stockfish-compatible binary over
//! stdin/stdout. The protocol subset is tiny: handshake, options, then
//! `position fen …` / `go depth …` / `bestmove` per request. Every exchange
//! is bounded by a timeout so a wedged engine degrades into "backend
//! unavailable" instead of stalling the session.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;
use tracing::{debug, info};

/// One candidate move for a position, or `None` when the source has nothing
/// to offer. Implementations must not assume their answer gets played; the
/// session re-validates every proposal.
#[async_trait]
pub trait MoveSource: Send {
    async fn best_move(&mut self, fen: &str, depth: u32) -> Result<Option<String>>;
}

/// Launch parameters for the UCI subprocess
#[derive(Debug, Clone)]
pub struct UciConfig {
    pub path: String,
    pub threads: u32,
    pub hash_mb: u32,
    /// Ceiling for any single engine exchange, search included.
    pub reply_timeout: Duration,
}

impl UciConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            threads: 2,
            hash_mb: 16,
            reply_timeout: Duration::from_secs(10),
        }
    }
}

/// A running UCI engine process
pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    reply_timeout: Duration,
}

impl UciEngine {
    /// Spawn the engine and complete the UCI handshake
    pub async fn spawn(config: &UciConfig) -> Result<Self> {
        let mut child = Command::new(&config.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to launch UCI engine at {}", config.path))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("engine stdin not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("engine stdout not captured"))?;

        let mut engine = Self {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
            reply_timeout: config.reply_timeout,
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;
        engine
            .send(&format!("setoption name Threads value {}", config.threads))
            .await?;
        engine
            .send(&format!("setoption name Hash value {}", config.hash_mb))
            .await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;
        info!("[ENGINE] UCI engine ready: {}", config.path);
        Ok(engine)
    }

    /// Ask the engine to quit and reap the process
    pub async fn shutdown(mut self) -> Result<()> {
        let _ = self.send("quit").await;
        self.child.wait().await.context("engine did not exit")?;
        Ok(())
    }

    async fn send(&mut self, line: &str) -> Result<()> {
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn wait_for(&mut self, token: &str) -> Result<()> {
        timeout(self.reply_timeout, async {
            while let Some(line) = self.lines.next_line().await? {
                if line.trim() == token {
                    return Ok(());
                }
            }
            Err(anyhow!("engine closed stdout waiting for {token}"))
        })
        .await
        .map_err(|_| anyhow!("engine timed out waiting for {token}"))?
    }
}

#[async_trait]
impl MoveSource for UciEngine {
    async fn best_move(&mut self, fen: &str, depth: u32) -> Result<Option<String>> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;

        let best = timeout(self.reply_timeout, async {
            while let Some(line) = self.lines.next_line().await? {
                if let Some(rest) = line.strip_prefix("bestmove") {
                    return Ok(rest.split_whitespace().next().map(str::to_owned));
                }
            }
            Err(anyhow!("engine closed stdout during search"))
        })
        .await
        .map_err(|_| anyhow!("engine timed out during search"))??;

        debug!("[ENGINE] bestmove {best:?} at depth {depth}");
        Ok(best.filter(|m| m != "(none)"))
    }
}
