use std::io::BufRead;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use agent_subtitles::{Config, SessionConfig, SubtitleSession, SubtitleStatus};

/// Replay transcript frames from stdin and print subtitle updates.
///
/// Accepts one frame per line in either the legacy pipe-delimited form or
/// the structured JSON form.
#[derive(Debug, Parser)]
#[command(name = "agent-subtitles", version)]
struct Args {
    /// Path to a config file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Override the staleness threshold in seconds
    #[arg(long)]
    stale_secs: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut session_config = match &args.config {
        Some(path) => Config::load(path)?.session_config(),
        None => SessionConfig::default(),
    };

    if let Some(secs) = args.stale_secs {
        session_config.reassembly.stale_after = Duration::from_secs(secs);
    }

    info!("agent-subtitles v0.1.0");
    info!("Session: {}", session_config.session_id);

    let mut session = SubtitleSession::new(session_config);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(event) = session.handle_raw(&line) {
            match event.status {
                SubtitleStatus::InProgress => {
                    print!("\r[{:?} #{}] {}", event.speaker, event.turn_id, event.text);
                    std::io::Write::flush(&mut std::io::stdout()).ok();
                }
                status => {
                    println!(
                        "\n[{:?} #{}] {} ({:?})",
                        event.speaker, event.turn_id, event.text, status
                    );
                }
            }
        }
    }

    let stats = session.stats();
    info!(
        "Done: {} subtitles from {} frames ({} expired, {} invalid, {} malformed)",
        stats.subtitles_emitted,
        stats.reassembly.frames_ingested,
        stats.reassembly.expired,
        stats.reassembly.invalid_fragments,
        stats.malformed_frames
    );

    Ok(())
}
