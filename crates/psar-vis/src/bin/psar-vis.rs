//! PSAR Ring Visualizer
//!
//! Usage:
//!   psar-vis [console] [participants]
//!   psar-vis serve [participants] [port]
//!
//! Environment:
//!   PSAR_PARTICIPANTS, PSAR_CHANNEL_CAPACITY, PSAR_PACE_MS, PSAR_POLL_MS
//!   RUST_LOG (default: psar_vis=info,psar_ring=info)

use std::env;

use psar_ring::RingConfig;
use psar_vis::{run_console, Error, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn parse_arg<T: std::str::FromStr>(
    args: &[String],
    index: usize,
    what: &str,
) -> psar_vis::Result<Option<T>> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidInput(format!("{what}: {raw}"))),
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "psar_vis=info,psar_ring=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (mode, rest) = match args.first().map(String::as_str) {
        Some("serve") => ("serve", &args[1..]),
        Some("console") => ("console", &args[1..]),
        _ => ("console", &args[..]),
    };

    let vis = VisConfig::from_env()?;
    let mut ring = RingConfig::from_env()?;
    if let Some(participants) = parse_arg(rest, 0, "participants")? {
        ring = ring.with_participants(participants);
        ring.validate()?;
    }
    let ring = vis.paced(ring);

    match mode {
        "serve" => {
            let port: u16 = parse_arg(rest, 1, "port")?.unwrap_or(3000);
            println!("PSAR Prefix-Sum (Animated Ring)");
            println!(
                "Ring of {} participants, {} rounds",
                ring.participants,
                ring.rounds()
            );
            println!("Open http://localhost:{} and press Start.", port);

            VisServer::new(ring, vis)?.serve(port).await?;
        }
        _ => {
            println!("PSAR Prefix-Sum (Animated Ring)");
            println!("===============================");
            println!();

            let mut stdout = std::io::stdout();
            let outcome = run_console(ring, &vis, &mut stdout).await?;

            println!();
            println!("Final accumulators: {:?}", outcome.accumulators());
            println!("Ring total: {}", outcome.total());
        }
    }

    Ok(())
}
