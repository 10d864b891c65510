//! Replays a script of client frames against an in-process engine.
//!
//! Reads one JSON object per line from stdin:
//!
//! ```text
//! {"caller": 1, "frame": {"type": "Create", "first_player_id": 1, "second_player_id": 2}}
//! {"caller": 1, "frame": {"type": "Join", "match_id": 1, "participant_id": 1}}
//! ```
//!
//! and prints each reply, one per line, to stdout. Concluded matches are
//! printed as they happen. Set `RUST_LOG=debug` to see rejections.

use cornerjump::{MatchConcluded, MatchService, PlayerId};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// One line of the script.
#[derive(Deserialize)]
struct ScriptLine {
    caller: Option<PlayerId>,
    frame: serde_json::Value,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn print_outcomes(mut outcomes: mpsc::UnboundedReceiver<MatchConcluded>) {
    while let Some(concluded) = outcomes.recv().await {
        match serde_json::to_string(&concluded) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "failed to encode outcome"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let service = MatchService::builder().outcome_sink(outcome_tx).build();
    let printer = tokio::spawn(print_outcomes(outcome_rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let script: ScriptLine = match serde_json::from_str(&line) {
            Ok(script) => script,
            Err(e) => {
                tracing::warn!(line_no, error = %e, "skipping malformed script line");
                continue;
            }
        };

        let frame = serde_json::to_vec(&script.frame)?;
        let reply = service.handle_frame(script.caller, &frame).await?;
        println!("{}", String::from_utf8_lossy(&reply));
    }

    tracing::info!(lines = line_no, matches = service.match_count().await, "script finished");
    drop(service);
    printer.await?;
    Ok(())
}
