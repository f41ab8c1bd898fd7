use anyhow::Result;
use clap::Parser;
use tracing::debug;

use clemens_cli::{
    cli::{Cli, Commands},
    commands, logging,
};
use clemens_config::ConfigLoader;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(cli.config.as_deref())?;
    logging::init(cli.log_level, cli.verbose, &config.logging);
    debug!("Loaded configuration");

    match cli.command {
        Commands::Parse {
            path,
            protocol,
            recursive,
            pattern,
            format,
        } => commands::parse::execute(&config, &path, protocol, recursive, pattern, format),
        Commands::Export {
            folder,
            output,
            protocols,
        } => commands::export::execute(&config, &folder, &output, protocols),
        Commands::Vault {
            folder,
            output,
            name,
        } => commands::vault::execute(config, &folder, &output, name),
        Commands::Pdf {
            folder,
            output,
            summary,
            title,
        } => commands::pdf::execute(&config, &folder, &output, summary, title.as_deref()),
        Commands::Config(cmd) => commands::config::execute(cmd, &config, cli.config.as_deref()),
    }
}
