//! Server network layer: accepts TCP connections and spawns one session each

use crate::config::GameConfig;
use crate::error::ServerError;
use crate::session::Session;
use crate::state::SharedState;
use log::{debug, error, info, warn};
use shared::ServerMessage;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

/// Listening game server
pub struct Server {
    listener: TcpListener,
    config: Arc<GameConfig>,
    state: Arc<SharedState>,
    next_client_id: u64,
}

impl Server {
    /// Validates `config` and binds the listening socket
    ///
    /// Both failures are fatal for the process.
    pub async fn bind(config: GameConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            state: Arc::new(SharedState::new(config.leaderboard_size)),
            config: Arc::new(config),
            next_client_id: 1,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> Arc<SharedState> {
        Arc::clone(&self.state)
    }

    /// Accept loop; never returns under normal operation
    ///
    /// Every accepted connection gets the next id. Connections beyond the
    /// configured ceiling are told the server is full and closed; the rest
    /// run as independent tasks that the loop does not wait for.
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!(
            "Accepting players (max {}, numbers {}..={}, top {})",
            self.config.max_clients,
            self.config.min_number,
            self.config.max_number,
            self.config.leaderboard_size
        );

        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    continue;
                }
            };

            let client_id = self.next_client_id;
            self.next_client_id += 1;

            let Some(slot) = self.state.try_acquire_slot(self.config.max_clients) else {
                warn!(
                    "Client #{} from {} rejected: server full ({} clients)",
                    client_id, addr, self.config.max_clients
                );
                Self::reject(stream).await;
                continue;
            };

            info!("Client #{} connected from {}", client_id, addr);
            let state = Arc::clone(&self.state);
            let config = Arc::clone(&self.config);

            tokio::spawn(async move {
                let _slot = slot;
                let session = Session::new(client_id, stream, state, &config);
                if let Err(e) = session.run().await {
                    warn!("Client #{}: session ended with error: {}", client_id, e);
                }
            });
        }
    }

    async fn reject(mut stream: TcpStream) {
        let notice = ServerMessage::error("server full, maximum number of players reached, try again later");

        let result = match notice.to_line() {
            Ok(line) => stream.write_all(line.as_bytes()).await,
            Err(e) => {
                error!("Failed to encode rejection: {}", e);
                Ok(())
            }
        };
        if let Err(e) = result {
            debug!("Failed to send rejection: {}", e);
        }
        let _ = stream.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};

    fn local_config(max_clients: usize) -> GameConfig {
        GameConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_clients,
            ..GameConfig::default()
        }
    }

    async fn first_message(stream: TcpStream) -> ServerMessage {
        let mut lines = BufReader::new(stream).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        ServerMessage::from_line(&line).unwrap()
    }

    #[tokio::test]
    async fn test_bind_rejects_invalid_config() {
        let config = GameConfig {
            min_number: 5,
            max_number: 1,
            ..local_config(1)
        };
        assert!(matches!(
            Server::bind(config).await,
            Err(ServerError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let first = Server::bind(local_config(1)).await.unwrap();
        let port = first.local_addr().unwrap().port();

        let taken = GameConfig {
            port,
            ..local_config(1)
        };
        match Server::bind(taken).await {
            Err(ServerError::Bind { addr, .. }) => assert!(addr.ends_with(&port.to_string())),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("second bind on the same port succeeded"),
        }
    }

    #[tokio::test]
    async fn test_accepted_client_is_greeted() {
        let mut server = Server::bind(local_config(2)).await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(async move { server.run().await });

        let stream = TcpStream::connect(addr).await.unwrap();
        assert!(matches!(
            first_message(stream).await,
            ServerMessage::Stats {
                active_clients: 1,
                total_served: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_server_full_rejects_connection() {
        let mut server = Server::bind(local_config(1)).await.unwrap();
        let addr = server.local_addr().unwrap();
        let state = server.state();
        tokio::spawn(async move { server.run().await });

        let first = TcpStream::connect(addr).await.unwrap();
        let mut first_lines = BufReader::new(first).lines();
        assert!(first_lines.next_line().await.unwrap().is_some());

        let second = TcpStream::connect(addr).await.unwrap();
        match first_message(second).await {
            ServerMessage::Error { message } => assert!(message.contains("server full")),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(state.active_connections(), 1);
        assert_eq!(state.total_served(), 1);
    }
}
