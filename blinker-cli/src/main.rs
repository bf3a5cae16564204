use anyhow::{Context, bail};
use blinker::mcp2221::MCP2221;
use blinker::{ShutdownSignal, relay};
use clap::Parser;
use embedded_hal::digital::PinState;
use log::info;

mod cli;
mod util;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = cli::Cli::parse();
    if cli.input == cli.output {
        bail!("--in and --out must be different pins, both are {}", cli.input);
    }
    let config = cli.config();
    info!("Blinker: switch on {}, LED on {}", cli.input, cli.output);

    let shutdown = ShutdownSignal::new();
    shutdown
        .on_termination()
        .context("Failed to install the Ctrl-C handler")?;

    let device = MCP2221::connect_with_vid_and_pid(cli.vid, cli.pid)
        .with_context(|| format!("Failed to open MCP2221 {:#06X}:{:#06X}", cli.vid, cli.pid))?;
    let switch = device
        .take_pin(cli.input)
        .and_then(|pin| pin.into_input())
        .with_context(|| format!("Failed to set up {} as the switch input", cli.input))?;
    let led = device
        .take_pin(cli.output)
        .and_then(|pin| pin.into_output(PinState::Low))
        .with_context(|| format!("Failed to set up {} as the LED output", cli.output))?;

    relay::run(switch, led, &config, &shutdown)?;
    Ok(())
}
