//! Render command - Show a level as the simulator sees it

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output,
    level::{Grid, GridOptions},
    sim::{ObservationWindow, Simulator, SimulatorConfig},
};

#[derive(Parser, Debug)]
#[command(about = "Print a level and the agent's starting view")]
pub struct RenderArgs {
    /// Level file
    pub level: PathBuf,

    /// Columns in the screen view
    #[arg(long, default_value_t = SimulatorConfig::DEFAULT_SCREEN_WIDTH)]
    pub screen_width: usize,

    /// Strict level height; shorter levels are padded with blank rows on top
    #[arg(long)]
    pub level_height: Option<usize>,

    /// Observation window height in rows
    #[arg(long, default_value_t = 3)]
    pub window_height: usize,

    /// Observation window look-ahead in columns
    #[arg(long, default_value_t = 5)]
    pub window_width: usize,
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let options = match args.level_height {
        Some(height) => GridOptions::new().with_height(height),
        None => GridOptions::new(),
    };
    let grid = Grid::load(&args.level, &options)
        .with_context(|| format!("failed to load level {}", args.level.display()))?;

    let config = SimulatorConfig::default()
        .with_screen_width(args.screen_width)
        .with_window(ObservationWindow::new(args.window_height, args.window_width));
    config.validate().context("invalid render settings")?;
    let sim = Simulator::new(&grid, config);

    output::print_section(&args.level.display().to_string());
    output::print_kv("Width", &grid.width().to_string());
    output::print_kv("Height", &grid.height().to_string());
    output::print_kv("Start", &sim.position().to_string());
    output::print_kv("Fingerprint", &format!("{:?}", sim.fingerprint().as_str()));

    output::print_subsection("Level");
    print!("{grid}");

    output::print_subsection("Screen");
    println!("{}", sim.render());

    Ok(())
}
