//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// harbour-ports - inspect and validate vcpkg-style port descriptors
#[derive(Parser)]
#[command(name = "harbour-ports")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a port and report every problem with its descriptor
    Check(CheckArgs),

    /// Show the dependencies of a port for one triplet
    Depends(DependsArgs),

    /// Load every port in a ports directory
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Port directory, CONTROL file, or vcpkg.json
    pub path: PathBuf,
}

#[derive(Args)]
pub struct DependsArgs {
    /// Port directory, CONTROL file, or vcpkg.json
    pub path: PathBuf,

    /// Feature whose dependencies to show
    #[arg(short, long, default_value = "core")]
    pub feature: String,

    /// Target triplet (defaults to config, then the host triplet)
    #[arg(short, long, env = "VCPKG_DEFAULT_TRIPLET")]
    pub triplet: Option<String>,

    /// Build variable visible to qualifiers
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Directory containing one subdirectory per port
    pub ports_dir: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))?;
    if key.is_empty() {
        return Err(format!("empty variable name in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}
