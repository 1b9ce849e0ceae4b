//! Command-line argument parsing
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::cli::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Silicon Sampling - selective persona retrieval for survey simulation
#[derive(Parser, Debug)]
#[command(name = "silicon-sampling")]
#[command(version)]
#[command(about = "Serve survey personas module-by-module to an LLM caller", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (errors only), default (info), -v (debug), -vv (trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only log errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory of persona JSON files (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub personas_dir: Option<PathBuf>,

    /// Directory of skill templates (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub skills_dir: Option<PathBuf>,

    /// Directory of rule templates (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub rules_dir: Option<PathBuf>,

    /// Subcommand (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve JSON-RPC over stdin/stdout
    Serve,

    /// List personas in the catalog
    Personas,

    /// List available survey skills
    Skills,

    /// Show framework status
    Status,

    /// Invoke a single tool and print its JSON result
    Call {
        /// Tool name, e.g. get_module_schema
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, value_name = "JSON")]
        args: Option<String>,

        /// Activate this persona before the call
        #[arg(long, value_name = "ID")]
        persona: Option<String>,
    },

    /// Display effective configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to run, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }

    /// Log filter directive: explicit flags win over the configured level
    pub fn log_level(&self, config: &Config) -> String {
        match self.verbosity() {
            Verbosity::Normal => config.logging.level.to_lowercase(),
            other => other.log_level().to_string(),
        }
    }

    /// Apply directory overrides on top of a loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.personas_dir {
            config.paths.personas_dir = dir.to_string_lossy().into_owned();
        }
        if let Some(dir) = &self.skills_dir {
            config.paths.skills_dir = dir.to_string_lossy().into_owned();
        }
        if let Some(dir) = &self.rules_dir {
            config.paths.rules_dir = dir.to_string_lossy().into_owned();
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Matching tracing level
    pub fn log_level(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}
