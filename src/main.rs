use anyhow::{anyhow, Context, Result};
use clap::Parser;

use stratokeister::cli::CliArgs;
use stratokeister::keymap::{load_default_fretboard, load_fretboard_with};
use stratokeister::script::{self, Script};
use stratokeister::{Keyboard, SimConfig};

fn main() -> Result<()> {
    stratokeister::tracing::init();

    let args = CliArgs::parse();
    let config = args.into_config(SimConfig::load()).map_err(|e| anyhow!(e))?;

    let board = match &config.wiring {
        Some(path) => load_fretboard_with(path)
            .with_context(|| format!("Failed to load wiring {}", path.display()))?,
        None => load_default_fretboard(),
    };
    let session = Script::load(&config.script)?;

    tracing::info!(
        "Running {} ({} steps) from layer {}",
        config.script.display(),
        session.steps.len(),
        config.sim.start_layer
    );

    let mut keyboard = Keyboard::with_config(board, &config.sim);
    for &step in &session.steps {
        let outcome = script::run_step(&mut keyboard, step);
        if config.json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else {
            println!("{}", outcome);
        }
    }

    if keyboard.bootloader_requested() {
        tracing::warn!("Script requested a jump to the bootloader");
    }

    Ok(())
}
