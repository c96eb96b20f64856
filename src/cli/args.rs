//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--root <path>`: Corpus root (default: current directory)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::Layer;

/// skillgraph - Validate and analyze a layered skill documentation corpus
#[derive(Parser, Debug)]
#[command(name = "skillgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Corpus root holding references/ and the layer rules
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The selected command; `validate` when none is given.
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Validate {
            layer: None,
            json: false,
        })
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate every skill document and the composition graph
    #[command(
        name = "validate",
        long_about = "Validate every skill document and the composition graph.\n\n\
            Checks frontmatter, required fields, layer and id conventions, \
            composition references, formulas and recommended sections for each \
            document, and detects cycles across the whole graph. Errors fail the \
            run; warnings are reported but never change the exit status.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Validate the corpus in the current directory (also the default command)
    skillgraph validate

    # Only check the atoms layer (cycles are still corpus-wide)
    skillgraph validate --layer L1

    # Machine-readable findings for CI annotations
    skillgraph validate --json

EXIT STATUS:
    0   no errors (warnings allowed)
    1   one or more errors or cycles"
    )]
    Validate {
        /// Only validate documents in this layer's directory
        #[arg(long, value_name = "LAYER")]
        layer: Option<Layer>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the composition graph
    #[command(
        name = "graph",
        long_about = "Show what each skill composes and what composes it.\n\n\
            Lists every skill with its layer, its direct compositions and its \
            direct dependents. References to skills that are not loaded still \
            appear as compositions.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Human-readable adjacency
    skillgraph graph

    # Adjacency as JSON, same shape as the registry graph section
    skillgraph graph --json"
    )]
    Graph {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show corpus statistics
    #[command(
        name = "stats",
        long_about = "Show totals, per-layer statistics and rankings.\n\n\
            Reports the number of skills and composition edges, the document \
            count and average compositions per layer, the most reused skills \
            and the skills with the most direct dependencies.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Default ranking size (10, or `top` from config)
    skillgraph stats

    # Top 3 only, as JSON
    skillgraph stats --top 3 --json"
    )]
    Stats {
        /// Ranking size
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        top: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List skills nothing composes
    #[command(
        name = "orphans",
        long_about = "List skills that no other skill composes.\n\n\
            The lowest and highest layers are excluded: foundations and \
            top-level recipes are expected to have no dependents."
    )]
    Orphans {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check formulas on layers that require them
    #[command(
        name = "formulas",
        long_about = "Check formulas on layers that require them.\n\n\
            Reports skills with a missing formula or one that does not match the \
            configured formula pattern, and counts the valid ones."
    )]
    Formulas,

    /// List broken composition references
    #[command(
        name = "refs",
        long_about = "List composition references that point at no loaded skill.\n\n\
            Only well-formed `../directory/file.md` references are considered. \
            The listing is capped at `max_listed` (config, default 20).",
        after_help = "\
EXIT STATUS:
    0   every reference resolves
    1   at least one broken reference"
    )]
    Refs,

    /// Write the registry snapshot
    #[command(
        name = "registry",
        long_about = "Write the registry snapshot.\n\n\
            Serializes the graph, statistics, orphans, rankings, formulas and a \
            fingerprint of the edge set to JSON. The write is atomic: the previous \
            snapshot is replaced only once the new one is fully on disk.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Write <root>/_compositions.json
    skillgraph registry

    # Write somewhere else
    skillgraph registry --output build/compositions.json"
    )]
    Registry {
        /// Output path (default: registry file under the corpus root)
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for skillgraph commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash
    skillgraph completion bash >> ~/.bashrc

    # Zsh
    skillgraph completion zsh > ~/.zfunc/_skillgraph

    # Fish
    skillgraph completion fish > ~/.config/fish/completions/skillgraph.fish

    # PowerShell
    skillgraph completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
