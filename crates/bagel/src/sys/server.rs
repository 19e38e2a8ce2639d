use crate::events::AppEvent;
use async_channel::Sender;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/bagel.sock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay, clap::Subcommand)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Command {
    /// Open the menu at the cursor
    Open,
    /// Close the menu
    Close,
    /// Open the menu, or close it if it is already open
    Toggle,
}

impl From<Command> for AppEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Open => AppEvent::Open,
            Command::Close => AppEvent::Close,
            Command::Toggle => AppEvent::Toggle,
        }
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match Command::from_str(line.trim()) {
                            Ok(command) => {
                                if tx.send(command.into()).await.is_err() {
                                    break;
                                }
                            }
                            Err(_) => log::warn!("Unknown socket command: {:?}", line),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

pub fn send_command(command: Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to bagel daemon at {}: {}. Is bagel running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_round_trip() {
        for (line, expected) in [
            ("open", Command::Open),
            ("CLOSE", Command::Close),
            ("Toggle", Command::Toggle),
        ] {
            assert_eq!(Command::from_str(line).unwrap(), expected);
        }
        assert_eq!(Command::Toggle.to_string(), "toggle");
        assert!(Command::from_str("show").is_err());
    }
}
