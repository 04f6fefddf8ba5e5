#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::time::Duration;

use anyhow::anyhow;
use clap::Parser;
use eframe::egui::Vec2;
use gv_graphics::{CanvasConfig, Mode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// Print version of the tool
    #[arg(short, long)]
    version: bool,

    /// Width of a new canvas
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Height of a new canvas
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Interaction mode of a new canvas
    #[arg(long, default_value_t = Mode::PaintVertices)]
    mode: Mode,

    /// Milliseconds between two steps of a BFS animation
    #[arg(long, value_name = "MS", default_value_t = 500)]
    step_ms: u64,
}

fn main() -> anyhow::Result<()> {
    // Log to stdout (if you run with `RUST_LOG=debug`).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.version {
        println!("graph visualiser: {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = CanvasConfig {
        size: Vec2::new(args.width, args.height),
        initial_mode: args.mode,
        ..CanvasConfig::default()
    };
    let step = Duration::from_millis(args.step_ms);

    eframe::run_native(
        "Graph Visualiser",
        eframe::NativeOptions::default(),
        Box::new(move |cc| Ok(Box::new(gv_gui::App::new(cc, config, step)))),
    )
    .map_err(|err| anyhow!("{}", err))?;

    Ok(())
}
