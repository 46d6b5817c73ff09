use clap::Parser;
use log::{error, info};
use server::config::GameConfig;
use server::network::Server;
use std::future::Future;

// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = shared::DEFAULT_PORT)]
    port: u16,

    /// Maximum number of simultaneous players
    #[arg(short, long, default_value_t = shared::MAX_CLIENTS)]
    max_clients: usize,

    /// Lowest number that can be drawn
    #[arg(long, default_value_t = shared::MIN_NUMBER, allow_negative_numbers = true)]
    min_number: i64,

    /// Highest number that can be drawn
    #[arg(long, default_value_t = shared::MAX_NUMBER, allow_negative_numbers = true)]
    max_number: i64,

    /// Number of entries kept on the leaderboard
    #[arg(long, default_value_t = shared::LEADERBOARD_SIZE)]
    leaderboard_size: usize,
}

impl Args {
    fn into_config(self) -> GameConfig {
        GameConfig {
            host: self.host,
            port: self.port,
            max_clients: self.max_clients,
            min_number: self.min_number,
            max_number: self.max_number,
            leaderboard_size: self.leaderboard_size,
            ..GameConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config();
    info!(
        "Starting guessing game server (score = {} - attempts x {} - seconds)",
        config.initial_score, config.attempt_penalty
    );

    let mut server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return Err(e.into());
        }
    };

    let shutdown = shutdown_signal()?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
                return Err(e.into());
            }
        }
        signal = shutdown => {
            info!("Received {}, shutting down", signal);
        }
    }

    Ok(())
}

/// Resolves with the signal name on Ctrl+C or SIGTERM
///
/// Handlers are installed before this returns, so a signal arriving before
/// the future is first polled is not lost.
#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<impl Future<Output = &'static str>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => "Ctrl+C",
            _ = terminate.recv() => "SIGTERM",
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> std::io::Result<impl Future<Output = &'static str>> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
        "Ctrl+C"
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Command;
    use std::time::Duration;

    #[tokio::test]
    async fn test_sigterm_triggers_shutdown() {
        let shutdown = shutdown_signal().unwrap();

        let status = Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let signal = tokio::time::timeout(Duration::from_secs(5), shutdown)
            .await
            .expect("shutdown future did not resolve");
        assert_eq!(signal, "SIGTERM");
    }

    #[test]
    fn test_args_map_onto_config() {
        let args = Args::parse_from(["server", "-p", "9001", "-m", "4", "--min-number", "-5"]);
        let config = args.into_config();

        assert_eq!(config.port, 9001);
        assert_eq!(config.max_clients, 4);
        assert_eq!(config.min_number, -5);
        assert_eq!(config.max_number, shared::MAX_NUMBER);
        assert_eq!(config.max_name_attempts, shared::MAX_NAME_ATTEMPTS);
    }
}
