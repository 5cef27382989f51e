use anyhow::Result;
use clap::Parser;

use treeprobe::Settings;
use treeprobe::cli::commands::check::CheckArgs;
use treeprobe::cli::{Cli, Commands, commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;

    treeprobe::logging::init_with_config(&settings.logging);

    match cli.command {
        Commands::Check {
            repository_id,
            commit,
            root,
            frontend_url,
            allow_outside_root,
            show_dropped,
            input,
        } => {
            let args = CheckArgs {
                repository_id,
                commit,
                root,
                frontend_url,
                allow_outside_root,
                show_dropped,
                input,
            };
            commands::check::run(args, &settings).await
        }
        Commands::Config => commands::config::run(&settings),
        Commands::Relative { base, target } => commands::relative::run(&base, &target),
    }
}
