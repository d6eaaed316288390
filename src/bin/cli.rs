//! Questline CLI Client
//!
//! Command-line client for poking a running Questline server over the line
//! protocol.

use std::io::{BufReader, Write};
use std::net::TcpStream;

use clap::{Parser, Subcommand};

use questline::protocol::{encode_command, read_response, Command};
use questline::{QuestlineError, Result};

/// Questline CLI
#[derive(Parser, Debug)]
#[command(name = "questline-cli")]
#[command(about = "CLI for the Questline progression server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7600")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a player's progression
    Load {
        /// The player id
        player_id: i64,
    },

    /// Apply a quest event to a player
    Event {
        /// The player id
        player_id: i64,

        /// The event type (quest name)
        event_type: String,

        /// The amount to apply
        amount: i64,
    },

    /// Ping the server
    Ping {
        /// The player id to echo
        player_id: i64,
    },
}

fn run(args: Args) -> Result<()> {
    let command = match args.command {
        Commands::Load { player_id } => Command::Load { player_id },
        Commands::Event {
            player_id,
            event_type,
            amount,
        } => Command::Event {
            player_id,
            event_type,
            amount,
        },
        Commands::Ping { player_id } => Command::Ping { player_id },
    };

    let stream = TcpStream::connect(&args.server)?;
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);

    let line = encode_command(&command)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    match read_response(&mut reader)? {
        Some(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        None => Err(QuestlineError::Protocol(
            "server closed the connection without responding".to_string(),
        )),
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
