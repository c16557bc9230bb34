//! Terminal harness for the tapster engine
//!
//! Reads lines from stdin as stand-in transcription results and prints the
//! engine's responses. A line is treated as a final transcript at high
//! confidence; prefix it with `@0.3` to simulate a low-confidence result.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::thread;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tapster::{
    Config, ControllerCommand, EngineEvent, Mode, ModeController, TERMINATION_SENTINEL,
    TranscriptEvent,
};

const DEFAULT_CONFIDENCE: f32 = 0.95;

#[derive(Parser)]
#[command(name = "tapster", about = "Voice command engine, driven from stdin")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "tapster.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    info!(name = %config.name, "starting engine");

    let (mut controller, mut events) = ModeController::new(&config)?;
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

    // Ctrl+C behaves like an external stop() call
    let ctrlc_tx = cmd_tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(ControllerCommand::Stop);
    })?;

    // Blocking stdin reader, bridged into the async loop
    let (line_tx, line_rx) = flume::unbounded::<String>();
    thread::spawn(move || {
        let mut input = String::new();
        loop {
            input.clear();
            match std::io::stdin().read_line(&mut input) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let _ = line_tx.send(input.trim().to_string());
                }
            }
        }
    });

    let feeder_tx = cmd_tx.clone();
    tokio::spawn(async move {
        while let Ok(line) = line_rx.recv_async().await {
            if line.is_empty() {
                continue;
            }
            let command = match parse_line(&line) {
                Some(event) => ControllerCommand::Transcript(event),
                None => {
                    error!(line = %line, "unparseable confidence prefix");
                    continue;
                }
            };
            if feeder_tx.send(command).is_err() {
                break;
            }
        }
        // stdin closed: treat like the transcription stream ending
        let _ = feeder_tx.send(ControllerCommand::Stop);
    });

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event);
        }
    });

    println!("Say the wake word to begin (default: \"hey bar\"). Ctrl+C to quit.");
    controller.run(cmd_rx).await;
    drop(controller);
    let _ = printer.await;

    Ok(())
}

/// Parse `@0.3 some words` into a transcript event; bare lines get the
/// default confidence.
fn parse_line(line: &str) -> Option<TranscriptEvent> {
    if let Some(rest) = line.strip_prefix('@') {
        let (conf, text) = rest.split_once(' ')?;
        let confidence: f32 = conf.parse().ok()?;
        Some(TranscriptEvent::final_text(text.trim(), confidence))
    } else {
        Some(TranscriptEvent::final_text(line, DEFAULT_CONFIDENCE))
    }
}

fn print_event(event: &EngineEvent) {
    match event {
        EngineEvent::WakeWordDetected { phrase, score } => {
            println!("[wake] \"{}\" (score {:.2})", phrase, score);
        }
        EngineEvent::CommandReceived { text, response, .. } => {
            if text == TERMINATION_SENTINEL {
                println!("[session end] {}", response.message);
            } else {
                println!("[{}] {}", response.action, response.message);
                if let Some(data) = &response.data {
                    println!("        {}", data);
                }
            }
        }
        EngineEvent::ModeChanged(mode) => match mode {
            Mode::WakeWord => println!("-- listening for wake word --"),
            Mode::Command => println!("-- command session open --"),
            Mode::Shutdown => println!("-- shut down --"),
        },
    }
}
