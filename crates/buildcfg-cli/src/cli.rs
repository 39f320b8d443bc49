//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// buildcfg - Resolve target build configurations and check shared environments
#[derive(Parser, Debug)]
#[command(name = "buildcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Config sources shared by every resolving command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SourceArgs {
    /// Target platform
    #[arg(short, long, default_value = "Win64")]
    pub platform: String,

    /// Build configuration
    #[arg(short, long, default_value = "Development")]
    pub configuration: String,

    /// Project file (.uproject); enables project config and nativized plugins
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Engine config directory holding BaseEngine.toml
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// JSON file with pak encryption and signing settings
    #[arg(long)]
    pub crypto: Option<PathBuf>,

    /// Treat the engine as an installed build
    #[arg(long)]
    pub installed: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve and print one target's finalized configuration
    ///
    /// Arguments after `--` form the target's command line.
    ///
    /// Examples:
    ///   buildcfg resolve --name MyGame
    ///   buildcfg resolve --name MyEditor --type Editor --json
    ///   buildcfg resolve --name MyGame -p Linux -- -StaticCRT -Define=FOO=1
    Resolve {
        /// Target name
        #[arg(short, long)]
        name: String,

        /// Target type
        #[arg(short = 't', long = "type", default_value = "Game")]
        target_type: String,

        #[command(flatten)]
        sources: SourceArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Target command line
        #[arg(last = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Check whether targets can share one build environment
    ///
    /// Each target is given as NAME:TYPE, optionally followed by
    /// :ARGS with a whitespace-separated command line.
    ///
    /// Examples:
    ///   buildcfg check-env --target MyGame:Game --target MyServer:Server
    ///   buildcfg check-env --target A:Game --target "B:Game:-StaticCRT" --policy force-unique
    CheckEnv {
        /// Target to include (repeatable)
        #[arg(long = "target", required = true)]
        targets: Vec<String>,

        /// What to do on mismatch (error or force-unique)
        #[arg(long, default_value = "error")]
        policy: String,

        #[command(flatten)]
        sources: SourceArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the registered configuration fields
    Fields {
        /// Only list fields of this group (target, windows, mac, ...)
        #[arg(short, long)]
        group: Option<String>,

        /// Only list environment-sensitive fields
        #[arg(long)]
        sensitive: bool,
    },
}
