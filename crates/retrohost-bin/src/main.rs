// retrohost: interactive demo for the shim.
//
// Opens a window through the winit/wgpu backend and moves a square around
// with the bound keys.

mod demo;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};
use retrohost_core::{KeyBindings, Shim};
use retrohost_types::{DispatchMode, OpenFlags, OpenOptions};
use retrohost_winit::WinitHost;

use demo::{Demo, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dispatch {
    /// Report every bound key as pressed on any keyboard event.
    Legacy,
    /// Report only press and release edges.
    Edge,
}

impl From<Dispatch> for DispatchMode {
    fn from(value: Dispatch) -> Self {
        match value {
            Dispatch::Legacy => DispatchMode::Legacy,
            Dispatch::Edge => DispatchMode::EdgeStatus,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "retrohost", about = "Pixel surface and keyboard shim demo")]
struct Args {
    /// JSON file with window options; command-line values override it.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Window title.
    #[arg(long)]
    title: Option<String>,

    /// Surface width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Window size multiplier.
    #[arg(long)]
    scale: Option<u32>,

    /// Open flags, decimal or 0x-prefixed hex. Passed through unchanged.
    #[arg(long, value_parser = parse_flags)]
    flags: Option<OpenFlags>,

    /// Key bindings JSON file.
    #[arg(long, env = "RETROHOST_BINDINGS", default_value = "keybindings.json")]
    bindings: PathBuf,

    /// Key callback dispatch.
    #[arg(long, value_enum, default_value_t = Dispatch::Edge)]
    dispatch: Dispatch,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_flags(s: &str) -> Result<OpenFlags, String> {
    let bits = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    bits.map(OpenFlags).map_err(|e| format!("invalid flags {s:?}: {e}"))
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "retrohost=debug,retrohost_core=debug,retrohost_winit=debug,warn"
    } else {
        "retrohost=info,retrohost_core=info,retrohost_winit=info,warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

/// Read window options from `path`, or defaults when no file is given.
fn load_options(path: Option<&Path>) -> Result<OpenOptions> {
    let Some(path) = path else {
        return Ok(OpenOptions::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse options from {}", path.display()))
}

fn resolve_options(args: &Args) -> Result<OpenOptions> {
    let mut options = load_options(args.options.as_deref())?;
    if let Some(title) = &args.title {
        options.title = title.clone();
    }
    if let Some(width) = args.width {
        options.width = width;
    }
    if let Some(height) = args.height {
        options.height = height;
    }
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    if let Some(flags) = args.flags {
        options.flags = flags;
    }
    Ok(options)
}

fn run(args: &Args) -> Result<()> {
    let options = resolve_options(args)?;
    let bindings = KeyBindings::load_from(&args.bindings)?;
    let mode = DispatchMode::from(args.dispatch);

    let host = WinitHost::new()?;
    let mut shim = Shim::open(host, options, &bindings)?.with_dispatch_mode(mode);
    let mut demo = Demo::new(&mut shim, mode);

    while demo.frame(&mut shim) == Step::Continue {}

    info!(
        "{} frames in {:.1} s",
        shim.frame_count(),
        shim.ticks_ms() as f64 / 1000.0
    );
    shim.shutdown();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    info!("retrohost starting");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
