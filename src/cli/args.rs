//! Defines the command-line arguments and subcommands for the dumpcheck CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "dumpcheck",
    version,
    about = "Verify generated IR dumps against ordered check directives."
)]
pub struct DumpcheckArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Report format on stdout.
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    pub format: Format,

    /// When to color the text report.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Suffix overrides shared by every subcommand that touches dumps.
#[derive(Debug, Clone, Default, Args)]
pub struct SuffixArgs {
    /// Primary dump suffix (default ".ll").
    #[arg(long)]
    pub suffix: Option<String>,

    /// Optimized dump suffix; must end with the primary suffix (default "-optimized.ll").
    #[arg(long)]
    pub optimized_suffix: Option<String>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one check script against a dump directory.
    Run {
        /// The path to the check script.
        #[arg(required = true)]
        script: PathBuf,
        /// Directory holding the dumps.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        suffixes: SuffixArgs,
    },
    /// Discover and run all check scripts under a directory.
    Test {
        /// The path to the directory containing check scripts.
        #[arg(default_value = "tests/dumpcheck")]
        root: PathBuf,
        /// Directory holding the dumps.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Only run cases whose name contains this substring.
        #[arg(long)]
        filter: Option<String>,
        #[command(flatten)]
        suffixes: SuffixArgs,
    },
    /// Show which dump a method resolves to.
    Locate {
        /// Owning class, dotted (e.g. compiler.jeandle.TestVolatile).
        #[arg(long)]
        owner: String,
        /// Method name.
        #[arg(long)]
        member: String,
        /// Encoded descriptor such as "(I)V".
        #[arg(long, conflicts_with_all = ["returns", "params"])]
        signature: Option<String>,
        /// Return type name (e.g. void, int, java.lang.String).
        #[arg(long, required_unless_present = "signature")]
        returns: Option<String>,
        /// Parameter type name; repeat for each parameter.
        #[arg(long = "param")]
        params: Vec<String>,
        /// Select the optimized dump.
        #[arg(long)]
        optimized: bool,
        /// Which of several matching dumps to select.
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Directory holding the dumps.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Print the selected dump's normalized lines.
        #[arg(long)]
        print: bool,
        #[command(flatten)]
        suffixes: SuffixArgs,
    },
}
