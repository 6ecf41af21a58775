//! grabit - command-line driver
//!
//! Four commands: `decode` a bencoded value, print torrent `info`, list
//! `peers` from the tracker, and `download` the file. Errors surface as a
//! single `Error: <context>: <cause>` line and a non-zero exit code.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use grabit::bencode::{self, Value};
use grabit::client;
use grabit::metainfo::Metainfo;
use grabit::peer::PeerId;

#[derive(Debug, Parser)]
#[command(name = "grabit")]
#[command(about = "A minimal single-file BitTorrent v1 download client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a bencoded value and print its JSON equivalent
    Decode {
        /// The bencoded value, e.g. "d3:cow3:mooe"
        value: String,
    },
    /// Print a torrent file summary
    Info {
        /// Path to the .torrent file
        torrent: PathBuf,
    },
    /// Announce to the tracker and print the peer list
    Peers {
        /// Path to the .torrent file
        torrent: PathBuf,
        /// Port reported to the tracker
        #[arg(long, default_value_t = 6881)]
        port: u16,
    },
    /// Download the torrent's file
    Download {
        /// Where to write the downloaded file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        /// Path to the .torrent file
        torrent: PathBuf,
        /// Port reported to the tracker
        #[arg(long, default_value_t = 6881)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Decode { value } => {
            let decoded = bencode::decode(value.as_bytes()).context("failed to decode value")?;
            println!("{}", to_json(&decoded));
        }
        Command::Info { torrent } => {
            let metainfo = load_metainfo(&torrent)?;
            print!("{}", metainfo.summary());
        }
        Command::Peers { torrent, port } => {
            let metainfo = load_metainfo(&torrent)?;
            let peers = client::fetch_peers(&metainfo, &PeerId::generate(), port)
                .await
                .context("announce failed")?;
            for peer in peers {
                println!("{}", peer);
            }
        }
        Command::Download {
            output,
            torrent,
            port,
        } => {
            let metainfo = load_metainfo(&torrent)?;
            let data = client::download(&metainfo, PeerId::generate(), port)
                .await
                .context("download failed")?;
            std::fs::write(&output, &data)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Downloaded {} to {}", metainfo.name(), output.display());
        }
    }
    Ok(())
}

fn load_metainfo(path: &Path) -> Result<Metainfo> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Metainfo::from_bytes(&data).context("failed to parse torrent file")
}

// Byte strings render as lossy UTF-8; the decode command is meant for the
// textual values a user pastes on the command line.
fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Bytes(b) => serde_json::Value::String(String::from_utf8_lossy(b).into_owned()),
        Value::List(l) => serde_json::Value::Array(l.iter().map(to_json).collect()),
        Value::Dict(d) => serde_json::Value::Object(
            d.iter()
                .map(|(k, v)| (String::from_utf8_lossy(k).into_owned(), to_json(v)))
                .collect(),
        ),
    }
}
