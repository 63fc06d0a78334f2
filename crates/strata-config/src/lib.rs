//! Configuration for terrain generation runs.
//!
//! Settings persist to disk as `config.ron`. Every section is
//! `#[serde(default)]`, so partial files load and unknown keys are ignored.
//! Command-line flags override loaded values via [`Config::apply_cli_overrides`].

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BrushConfig, BrushStamp, Config, DebugConfig, ErosionConfig, GenerationConfig, LodConfig,
    OutputConfig,
};
pub use error::ConfigError;
