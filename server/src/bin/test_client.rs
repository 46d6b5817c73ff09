//! Automated player: joins the server and finds the number by bisection.

use clap::Parser;
use shared::{Direction, ServerMessage};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Player name (3-10 letters)
    #[arg(short = 'n', long, default_value = "robot")]
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let stream = TcpStream::connect(&args.server).await?;
    println!("Connected to {}", args.server);
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    let (mut low, mut high) = (shared::MIN_NUMBER, shared::MAX_NUMBER);
    let mut guess = None;

    while let Some(line) = lines.next_line().await? {
        let message = ServerMessage::from_line(&line)?;
        println!("<- {:?}", message);

        let reply = match message {
            ServerMessage::Prompt { .. } => Some(args.name.clone()),
            ServerMessage::GameStart { min, max, .. } => {
                low = min;
                high = max;
                let next = low + (high - low) / 2;
                guess = Some(next);
                Some(next.to_string())
            }
            ServerMessage::Hint { direction, .. } => {
                let last = guess.unwrap_or(low);
                match direction {
                    Direction::TooHigh => high = last - 1,
                    Direction::TooLow => low = last + 1,
                }
                let next = low + (high - low) / 2;
                guess = Some(next);
                Some(next.to_string())
            }
            ServerMessage::Error { message } if guess.is_none() => {
                println!("Server refused: {}", message);
                None
            }
            _ => None,
        };

        if let Some(reply) = reply {
            println!("-> {}", reply);
            writer.write_all(format!("{}\n", reply).as_bytes()).await?;
        }
    }

    println!("Disconnected");
    Ok(())
}
