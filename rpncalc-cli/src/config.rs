// Configuration - defaults, then config.toml, then RPNCALC_* variables, then flags

use anyhow::Context;
use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use rpncalc_core::session::{DEFAULT_MEMORY_SLOTS, DEFAULT_WIDTH};
use rpncalc_core::stack::DEFAULT_STACK_NAME;
use rpncalc_core::{Alignment, Settings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(
    name = "rpncalc",
    about = "An arbitrary-precision RPN calculator",
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Show the arithmetic trace and other debug output
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Load a named stack pair instead of the default one
    #[arg(short = 'l', long, value_name = "NAME")]
    pub load: Option<String>,

    /// Disable colored output
    #[arg(short = 'z', long = "no-color")]
    pub no_color: bool,

    /// Print the version and exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Print the license and exit
    #[arg(short = 'L', long)]
    pub license: bool,

    /// Display width in columns (at least 46)
    #[arg(short = 'w', long, value_name = "N")]
    pub width: Option<usize>,

    /// Stack alignment: l (left), d (decimal) or r (right)
    #[arg(short = 'a', long, value_name = "l|d|r")]
    pub align: Option<String>,

    /// Number of memory slots
    #[arg(short = 'm', long = "mem-slots", value_name = "N")]
    pub mem_slots: Option<usize>,

    /// Read settings from this file instead of the default config.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: usize,
    pub align: String,
    pub mem_slots: usize,
    pub color: bool,
    pub stack: String,
    /// Where stacks, memory and functions are kept. Defaults to `<data dir>/rpncalc`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            align: Alignment::Left.to_string(),
            mem_slots: DEFAULT_MEMORY_SLOTS,
            color: true,
            stack: DEFAULT_STACK_NAME.to_string(),
            data_dir: None,
        }
    }
}

/// `<config dir>/rpncalc/config.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rpncalc").join("config.toml"))
}

impl Config {
    /// Merge the defaults, the TOML file (when given and present) and `RPNCALC_*` variables.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed("RPNCALC_"))
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
    }

    /// Command-line flags win over everything else.
    pub fn with_args(mut self, args: &CliArgs) -> Self {
        if let Some(width) = args.width {
            self.width = width;
        }
        if let Some(align) = &args.align {
            self.align = align.clone();
        }
        if let Some(slots) = args.mem_slots {
            self.mem_slots = slots;
        }
        if let Some(name) = &args.load {
            self.stack = name.clone();
        }
        if args.no_color {
            self.color = false;
        }
        self
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        let alignment = Alignment::from_str(&self.align)
            .with_context(|| format!("Invalid alignment '{}'", self.align))?;
        Ok(Settings {
            width: self.width,
            alignment,
            memory_slots: self.mem_slots,
        }
        .normalized())
    }
}
