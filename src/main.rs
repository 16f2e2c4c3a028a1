use anyhow::{Context, Result};
use log::{info, warn};
use simple_logger::SimpleLogger;
use std::thread;
use std::time::{Duration, Instant};

use freeland::config::{default_config_path, load_or_create_config};
use freeland::net::{LoopbackTransport, TcpTransport, Transport};
use freeland::GameEngine;

const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

struct Args {
    offline: bool,
    frames: Option<u64>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args {
            offline: false,
            frames: None,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--offline" => args.offline = true,
                "--frames" => {
                    let value = iter.next().context("--frames needs a count")?;
                    args.frames = Some(value.parse().context("--frames must be a number")?);
                }
                other => warn!("Ignoring unknown argument {other}"),
            }
        }
        Ok(args)
    }
}

fn main() -> Result<()> {
    let config_path = default_config_path().context("Failed to locate config directory")?;
    let config = load_or_create_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    SimpleLogger::new()
        .with_level(config.logging.level_filter())
        .init()
        .context("Failed to initialise logger")?;
    info!("Loaded config from {}", config_path.display());

    let args = Args::parse()?;
    let transport: Box<dyn Transport> = if args.offline {
        info!("Running offline with a loopback link");
        Box::new(LoopbackTransport::echo())
    } else {
        Box::new(TcpTransport::new().context("Failed to start network transport")?)
    };

    let mut engine = GameEngine::new(config, transport);
    engine.init();
    engine.assets_mut().load_builtin();
    engine
        .start_session(Instant::now())
        .context("Failed to start game session")?;

    loop {
        let frame_start = Instant::now();
        if !engine.frame(frame_start) {
            break;
        }
        for payload in engine.connection_mut().take_inbox() {
            info!("Received {} bytes from server", payload.len());
        }

        if args.frames.is_some_and(|limit| engine.stats().frame_count >= limit) {
            engine.exit_session();
        }

        if let Some(rest) = FRAME_INTERVAL.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    let stats = engine.stats().clone();
    info!(
        "Session ended: {} frames, {} blocks, {} npcs, link {:?}",
        stats.frame_count, stats.block_count, stats.npc_count, stats.connection_state
    );
    engine.shutdown();
    Ok(())
}
