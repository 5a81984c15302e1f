//! CLI argument definitions for hdlsort.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hdlsort_core::config::LevelingStrategy;

#[derive(Parser, Debug)]
#[command(
    name = "hdlsort",
    version,
    about = "Order VHDL source files for compilation",
    long_about = "hdlsort scans VHDL sources for entities, architectures, packages and \
                  package bodies, follows their use clauses and instantiations, and prints \
                  the files in an order a compiler can analyze them in."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the compilation order and print, write, archive or run it
    Order(OrderArgs),

    /// List every design unit found in the sources
    Units {
        #[command(flatten)]
        source: SourceArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Where the sources come from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Source files or directories
    pub paths: Vec<PathBuf>,

    /// Library the positional paths belong to [default: first configured library, or WORK]
    #[arg(short, long)]
    pub library: Option<String>,

    /// Additional sources for another library, as LIB=PATH
    #[arg(short = 'L', long = "lib-path", value_name = "LIB=PATH")]
    pub lib_paths: Vec<String>,

    /// Project configuration file (defaults to the nearest HdlSort.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Keep only this architecture of an entity: ENTITY(ARCH) or LIB.ENTITY(ARCH)
    #[arg(long = "use-entity", value_name = "SPEC")]
    pub use_entity: Vec<String>,

    /// Order only what this top-level entity needs: [LIB.]ENTITY[(ARCH)]
    #[arg(long, value_name = "SPEC")]
    pub top: Vec<String>,

    /// Line template for printed and written lists
    #[arg(long, value_name = "TEMPLATE")]
    pub format: Option<String>,

    /// Shell command template run once per file
    #[arg(long, value_name = "TEMPLATE")]
    pub execute: Option<String>,

    /// Write the formatted list to a file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Concatenate the ordered sources into a file
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,

    /// Apply the output options to all libraries together
    #[arg(long)]
    pub all: bool,

    /// Leveling strategy: propagate or topological
    #[arg(long)]
    pub strategy: Option<LevelingStrategy>,

    /// Let use clauses naming other libraries order files
    #[arg(long)]
    pub cross_library: bool,

    /// Fail when any warning is reported
    #[arg(long)]
    pub deny_warnings: bool,
}

impl OrderArgs {
    /// Whether any output option was given on the command line.
    pub fn has_output_flags(&self) -> bool {
        self.all
            || self.format.is_some()
            || self.execute.is_some()
            || self.output.is_some()
            || self.archive.is_some()
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
