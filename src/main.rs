mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use clisso::workflow::GetOptions;
use console::style;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CLISSO_LOG";

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "clisso=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.config.as_deref();

    let result = match &cli.command {
        Commands::Get {
            app,
            shell,
            write_to_file,
            save_password,
        } => cli::get::run(
            config,
            &GetOptions {
                app: app.clone(),
                shell: *shell,
                write_to_file: write_to_file.clone(),
                save_password: *save_password,
            },
        ),

        Commands::Apps { command } => cli::apps::run(config, command),

        Commands::Providers { command } => cli::providers::run(config, command),
    };

    if let Err(e) = result {
        eprintln!("{}", style(format!("Error: {}", e)).red());
        std::process::exit(e.exit_code());
    }
}
