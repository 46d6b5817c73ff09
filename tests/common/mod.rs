//! Helpers for driving a real server over TCP

#![allow(dead_code)]

use server::config::GameConfig;
use server::network::Server;
use server::state::SharedState;
use shared::{Direction, ServerMessage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Binds a server on an ephemeral local port and runs it in the background
pub async fn start_server(max_clients: usize) -> (SocketAddr, Arc<SharedState>) {
    let config = GameConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_clients,
        ..GameConfig::default()
    };
    let mut server = Server::bind(config).await.expect("bind failed");
    let addr = server.local_addr().expect("no local addr");
    let state = server.state();
    tokio::spawn(async move { server.run().await });
    (addr, state)
}

pub struct TestPlayer {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestPlayer {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    /// Next raw line, or `None` once the server closed the connection
    pub async fn recv_raw(&mut self) -> Option<String> {
        timeout(READ_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for the server")
            .expect("read failed")
    }

    pub async fn recv(&mut self) -> ServerMessage {
        let line = self.recv_raw().await.expect("connection closed");
        ServerMessage::from_line(&line).expect("invalid json")
    }

    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .expect("write failed");
    }

    /// Reads the greeting and registers `name`, stopping at `game_start`
    pub async fn join(&mut self, name: &str) -> (i64, i64) {
        assert!(matches!(self.recv().await, ServerMessage::Stats { .. }));
        assert!(matches!(self.recv().await, ServerMessage::Leaderboard { .. }));
        assert!(matches!(self.recv().await, ServerMessage::Prompt { .. }));
        self.send(name).await;
        assert!(matches!(self.recv().await, ServerMessage::NameAccepted { .. }));
        match self.recv().await {
            ServerMessage::GameStart { min, max, .. } => (min, max),
            other => panic!("expected game_start, got {:?}", other),
        }
    }

    /// Bisects until the number is found; returns the victory message
    pub async fn solve(&mut self, min: i64, max: i64) -> ServerMessage {
        let (mut low, mut high) = (min, max);
        loop {
            let guess = low + (high - low) / 2;
            self.send(&guess.to_string()).await;
            match self.recv().await {
                ServerMessage::Hint {
                    direction: Direction::TooHigh,
                    ..
                } => high = guess - 1,
                ServerMessage::Hint {
                    direction: Direction::TooLow,
                    ..
                } => low = guess + 1,
                victory @ ServerMessage::Victory { .. } => return victory,
                other => panic!("unexpected message {:?}", other),
            }
        }
    }
}

/// Polls until the live-connection count drops to `expected`
pub async fn wait_for_active(state: &SharedState, expected: usize) {
    for _ in 0..200 {
        if state.active_connections() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "active connections stuck at {}, expected {}",
        state.active_connections(),
        expected
    );
}
