use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(crate) const DEFAULT_SEED: u64 = 0x5015_5CAFE;
pub(crate) const DEFAULT_STAR_COUNT: usize = 500_000;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "solarscope")]
#[command(about = "Interactive solar system viewer for the terminal")]
pub(crate) struct Cli {
    /// Frame rate cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Number of background stars
    #[arg(long)]
    pub(crate) stars: Option<usize>,

    /// Seed for the star field and initial planet phases
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Directory holding planet textures and the skybox/ faces
    #[arg(long, value_name = "DIR")]
    pub(crate) textures: Option<PathBuf>,

    /// Log file (default: solarscope.log in the data directory)
    #[arg(long, value_name = "PATH")]
    pub(crate) log_file: Option<PathBuf>,

    /// Force monochrome (no colors)
    #[arg(long, default_value_t = false)]
    pub(crate) no_color: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) star_count: usize,
    pub(crate) seed: u64,
    pub(crate) texture_dir: PathBuf,
    pub(crate) enable_color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 30,
            star_count: DEFAULT_STAR_COUNT,
            seed: DEFAULT_SEED,
            texture_dir: PathBuf::from("textures"),
            enable_color: true,
        }
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "solarscope", "Solarscope")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("solarscope.log"),
    })
}

/// Settings are read-only: the file is hand-edited and never written back.
/// Unreadable or malformed files fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    let Ok(text) = fs::read_to_string(path) else {
        log::debug!("no settings file at {}", path.display());
        return Settings::default();
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::warn!("ignoring malformed settings {}: {e}", path.display());
        Settings::default()
    })
}

/// Command-line flags win over the settings file.
pub(crate) fn resolve(cli: &Cli, file: Settings) -> Settings {
    Settings {
        fps_cap: cli.fps.unwrap_or(file.fps_cap),
        star_count: cli.stars.unwrap_or(file.star_count),
        seed: cli.seed.unwrap_or(file.seed),
        texture_dir: cli.textures.clone().unwrap_or(file.texture_dir),
        enable_color: file.enable_color && !cli.no_color,
    }
}

/// Routes the `log` facade to a file so the alternate screen stays clean.
/// `RUST_LOG` overrides the default `info` filter.
pub(crate) fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("installing logger")?;
    Ok(())
}
