mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render(args) => commands::render::run(args, cli.verbose),
        Commands::Schema { themes_dir, output } => {
            commands::schema::run(themes_dir, output, cli.verbose)
        }
        Commands::Themes { themes_dir, json } => commands::themes::run(themes_dir, json, cli.verbose),
        Commands::New { name, theme, force } => commands::new::run(name, theme, force, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or everything with `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}
