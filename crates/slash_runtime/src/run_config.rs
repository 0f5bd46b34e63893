//! Run Configuration
//!
//! Settings for one headless run. The simulation part is the same
//! `SimulationConfig` the library uses; the `[run]` table only concerns the
//! driver loop.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Command line: `--config <path>`, `--preset`, `--seed`, `--seconds`
//! 2. Environment variable: `SLASH_CONFIG=<path>`
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! [run]
//! tick_hz = 60
//! seconds = 30.0
//! realtime = true
//! hand = "figure_eight"  # figure_eight, circle, idle
//!
//! [simulation]
//! seed = 42
//!
//! [simulation.physics]
//! gravity = 9.8
//!
//! [simulation.spawn]
//! hazard_chance = 0.1
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slash_physics::{PhysicsError, SimulationConfig};
use thiserror::Error;

use crate::hand::HandScript;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "SLASH_CONFIG";

/// Runtime errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to start hand thread: {0}")]
    HandThread(#[source] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Simulation(#[from] PhysicsError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Driver loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Ticks per simulated second
    pub tick_hz: u32,
    /// Simulated seconds before the run ends
    pub seconds: f32,
    /// Sleep between ticks to match wall-clock time
    pub realtime: bool,
    /// Scripted hand motion
    pub hand: HandScript,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            seconds: 30.0,
            realtime: true,
            hand: HandScript::FigureEight,
        }
    }
}

impl RunSettings {
    /// Fixed timestep in seconds
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz.max(1) as f32
    }

    /// Number of ticks in the run
    pub fn total_ticks(&self) -> u64 {
        (self.seconds.max(0.0) * self.tick_hz as f32).round() as u64
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub run: RunSettings,
    pub simulation: SimulationConfig,
    /// Where this configuration was read from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl RunConfig {
    /// Load from command-line arguments, the environment and defaults
    pub fn load<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args = CliArgs::parse(args)?;

        let path = args
            .config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) if path.exists() => {
                let config = Self::load_from_file(&path)?;
                log::info!("Loaded run config from {}", path.display());
                config
            }
            Some(path) => {
                log::warn!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => {
                log::warn!("No config file given (--config or {CONFIG_ENV}), using defaults");
                Self::default()
            }
        };

        args.apply(&mut config);
        config.simulation.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content).map_err(|source| RuntimeError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Log the effective settings
    pub fn log_summary(&self) {
        let sim = &self.simulation;
        log::info!("Run configuration:");
        log::info!("  Source: {}", self.config_path.as_ref().map_or("defaults".into(), |p| p.display().to_string()));
        log::info!("  Tick: {} Hz for {} s (realtime: {})", self.run.tick_hz, self.run.seconds, self.run.realtime);
        log::info!("  Hand: {:?}", self.run.hand);
        log::info!("  Seed: {}", sim.seed.map_or("entropy".into(), |s| s.to_string()));
        log::info!("  Gravity: {}", sim.physics.gravity);
        log::info!("  Spawn interval: {}-{} s", sim.spawn.interval.min, sim.spawn.interval.max);
        log::info!("  Hazard chance: {}", sim.spawn.hazard_chance);
        log::info!("  Blade: r={} h={}", sim.blade.radius, sim.blade.height);
    }
}

/// Parsed command-line flags
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<PathBuf>,
    preset: Option<String>,
    seed: Option<u64>,
    seconds: Option<f32>,
    fast: bool,
}

impl CliArgs {
    fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value(&arg, args.next())?)),
                "--preset" => parsed.preset = Some(value(&arg, args.next())?),
                "--seed" => parsed.seed = Some(number(&arg, args.next())?),
                "--seconds" => parsed.seconds = Some(number(&arg, args.next())?),
                "--fast" => parsed.fast = true,
                other => return Err(RuntimeError::Argument(format!("unknown flag {other}"))),
            }
        }
        Ok(parsed)
    }

    /// Command-line flags win over the file
    fn apply(&self, config: &mut RunConfig) {
        if let Some(preset) = &self.preset {
            match preset.as_str() {
                "arcade" => config.simulation = SimulationConfig::arcade(),
                "relaxed" => config.simulation = SimulationConfig::relaxed(),
                "default" => config.simulation = SimulationConfig::default(),
                other => log::warn!("Unknown preset {other}, keeping configured simulation"),
            }
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(seconds) = self.seconds {
            config.run.seconds = seconds;
        }
        if self.fast {
            config.run.realtime = false;
        }
    }
}

fn value(flag: &str, next: Option<String>) -> Result<String> {
    next.ok_or_else(|| RuntimeError::Argument(format!("{flag} needs a value")))
}

fn number<T: std::str::FromStr>(flag: &str, next: Option<String>) -> Result<T> {
    let raw = value(flag, next)?;
    raw.parse()
        .map_err(|_| RuntimeError::Argument(format!("{flag}: cannot parse {raw:?}")))
}
