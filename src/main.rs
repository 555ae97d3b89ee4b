mod app;
mod assets;
mod body;
mod camera;
mod config;
mod controls;
mod focus;
mod hud;
mod input;
mod math;
mod orbit;
mod panel;
mod raster;
mod render;
mod scene;
mod sim;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = config::Cli::parse();
    let paths = config::project_paths()?;
    config::init_logging(cli.log_file.as_deref().unwrap_or(paths.log_path.as_path()))?;

    let settings = config::resolve(&cli, config::load_settings(&paths.settings_path));
    log::info!("starting with {settings:?}");
    app::run(settings)
}
