//! Rock Drift entry point
//!
//! Runs the simulation headless. Key events are read from stdin, one per
//! line (`press up`, `-left`, `fire`, ...); `quit` or end of input stops the
//! run unless a tick budget was given.
//!
//! Usage: `rock-drift [settings.json] [max_ticks]`

use std::io::BufRead;
use std::sync::Arc;

use tokio::sync::{Notify, mpsc};

use rock_drift::Settings;
use rock_drift::runner::{Session, input_channel};
use rock_drift::sim::{HeadlessSurface, KeyEvent, World};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    log::info!("Rock Drift (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) if path != "-" => Settings::load(path),
        _ => Settings::default(),
    };
    let max_ticks = args.next().and_then(|v| v.parse::<u64>().ok());

    let interval = settings.tick_interval();
    let world = World::new(settings, HeadlessSurface::new());

    let (input_tx, input_rx) = input_channel();
    // Blocking reader on its own thread so shutdown never waits on stdin
    std::thread::spawn(move || read_stdin(input_tx, max_ticks.is_some()));

    let shutdown = Arc::new(Notify::new());
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.notify_one();
            }
        });
    }

    // The tick loop has stopped before the registry is torn down
    let (world, reason) = Session::new(world, input_rx)
        .run(interval, max_ticks, shutdown)
        .await;
    let snapshot = world.snapshot();
    world.teardown();
    log::info!("Rock Drift stopped ({reason:?})");

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn read_stdin(tx: mpsc::Sender<KeyEvent>, hold_open: bool) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("stdin: {e}");
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") {
            return;
        }
        match KeyEvent::parse(trimmed) {
            Some(event) => {
                if tx.blocking_send(event).is_err() {
                    return;
                }
            }
            None => log::warn!("Ignoring input line {trimmed:?}"),
        }
    }

    // Let the tick budget end the run instead of end of input
    while hold_open && !tx.is_closed() {
        std::thread::park_timeout(std::time::Duration::from_millis(250));
    }
}
