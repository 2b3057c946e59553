//! CLI command structure using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use typstcv_core::design::DEFAULT_THEME;

#[derive(Parser)]
#[command(name = "typstcv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a YAML input to Typst and Markdown sources
    Render(RenderArgs),

    /// Print the JSON Schema of the input file
    Schema {
        /// Directory holding custom theme directories
        #[arg(long, env = "TYPSTCV_THEMES_DIR")]
        themes_dir: Option<PathBuf>,

        /// Write the schema to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List built-in and custom themes
    Themes {
        /// Directory holding custom theme directories
        #[arg(long, env = "TYPSTCV_THEMES_DIR")]
        themes_dir: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Write a sample input file to start from
    New {
        /// Full name, e.g. "Jane Doe"
        name: String,

        /// Theme of the sample's design block
        #[arg(long, default_value = DEFAULT_THEME)]
        theme: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct RenderArgs {
    /// Input YAML file
    pub input: PathBuf,

    /// Output directory [default: settings.render.output_folder next to the input]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory holding custom theme directories [default: the input's directory]
    #[arg(long, env = "TYPSTCV_THEMES_DIR")]
    pub themes_dir: Option<PathBuf>,

    /// Date used for "present" and the last-updated line (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Skip the Typst output
    #[arg(long)]
    pub no_typst: bool,

    /// Skip the Markdown output
    #[arg(long)]
    pub no_markdown: bool,
}
