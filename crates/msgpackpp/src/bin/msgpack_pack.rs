//! `msgpack-pack` - encode JSON (stdin or file) to MessagePack (stdout or file).
//!
//! Usage:
//!   msgpack-pack [--input FILE] [--output FILE] [--max-depth N] [--hex]

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use msgpackpp::cli::{pack_json, to_hex};
use msgpackpp::PackOptions;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "msgpack-pack", about = "Encode JSON as canonical MessagePack")]
struct Args {
    /// Read JSON from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write MessagePack to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reject input nested deeper than this many containers
    #[arg(long, env = "MSGPACKPP_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Print lowercase hex followed by a newline instead of raw bytes
    #[arg(long)]
    hex: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut json = String::new();
    match &args.input {
        Some(path) => {
            json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut json)
                .context("reading stdin")?;
        }
    }
    debug!(bytes = json.len(), "read input");

    let options = PackOptions {
        max_depth: args.max_depth,
        ..PackOptions::default()
    };
    let bytes = pack_json(json.trim(), &options)?;
    info!(bytes = bytes.len(), "packed");

    let payload = if args.hex {
        let mut line = to_hex(&bytes).into_bytes();
        line.push(b'\n');
        line
    } else {
        bytes
    };
    match &args.output {
        Some(path) => std::fs::write(path, &payload)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&payload).context("writing stdout")?;
            stdout.flush().context("writing stdout")?;
        }
    }
    Ok(())
}
