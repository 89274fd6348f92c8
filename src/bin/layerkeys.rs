// Layerkeys CLI
// Reads PRESS/RELEASE lines from stdin and types the mapped key sequences

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use layerkeys_core::{
    format_sequence, run_event_loop, Config, KeyInjector, LineSource, PrintInjector, RunSummary,
};

/// Layer-switching key presser for button controllers
#[derive(Parser, Debug)]
#[command(name = "layerkeys")]
#[command(author = "layerkeys contributors")]
#[command(version)]
#[command(about = "Layer-switching key presser for button controllers", long_about = None)]
struct Args {
    /// TOML layer configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Layer active at startup (1-based)
    #[arg(short = 'l', long, value_name = "N")]
    initial_layer: Option<usize>,

    /// Print key actions to stdout instead of typing them
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// List configured layers and exit
    #[arg(long)]
    list_layers: bool,
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "info" }),
    );
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).with_context(|| match &args.config {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load default config".to_string(),
    })?;

    if let Some(layer) = args.initial_layer {
        config
            .set_default_layer(layer)
            .context("Invalid --initial-layer")?;
    }
    Ok(config)
}

fn list_layers(config: &Config, out: &mut impl Write) -> io::Result<()> {
    let default_layer = config.effective_default_layer();
    for (index, layer) in config.layers.iter().enumerate() {
        let marker = if index == default_layer { " (default)" } else { "" };
        writeln!(out, "m{}: {}{}", index + 1, layer.name(), marker)?;
        for (button, sequence) in layer.mappings() {
            writeln!(out, "    {} = {}", button, format_sequence(sequence))?;
        }
    }
    Ok(())
}

fn run<I: KeyInjector + ?Sized>(config: &Config, injector: &mut I) -> Result<RunSummary> {
    let mut engine = config.to_engine();
    log::info!("Selected layer {}", engine.default_layer() + 1);

    let summary = run_event_loop(LineSource::stdin(), &mut engine, injector)
        .context("Event loop stopped")?;
    Ok(summary)
}

#[cfg(feature = "uinput")]
fn run_uinput(config: &Config) -> Result<RunSummary> {
    use layerkeys_core::VirtualKeyboard;

    let mut keyboard = VirtualKeyboard::new().context("Failed to create virtual keyboard")?;
    keyboard.set_throttle_delays(config.key_pre_delay_ms, config.key_post_delay_ms);
    log::debug!(
        "Throttle delays: pre={}ms post={}ms",
        config.key_pre_delay_ms,
        config.key_post_delay_ms
    );
    run(config, &mut keyboard)
}

#[cfg(not(feature = "uinput"))]
fn run_uinput(_config: &Config) -> Result<RunSummary> {
    anyhow::bail!("layerkeys was built without the 'uinput' feature; rebuild with --features uinput or use --dry-run")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;

    if args.list_layers {
        list_layers(&config, &mut io::stdout().lock())?;
        return Ok(());
    }

    if args.check_config {
        println!(
            "Configuration is valid ({} layers, default layer {})",
            config.layers.len(),
            config.effective_default_layer() + 1
        );
        return Ok(());
    }

    let summary = if args.dry_run {
        let mut printer = PrintInjector::new(io::stdout());
        run(&config, &mut printer)?
    } else {
        run_uinput(&config)?
    };

    log::debug!(
        "Processed {} events with {} diagnostics",
        summary.events,
        summary.diagnostics
    );
    Ok(())
}
