pub mod apps;
pub mod common;
pub mod get;
pub mod providers;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "clisso",
    version,
    about = "Get temporary cloud credentials through your identity provider"
)]
pub struct Cli {
    /// Config file (default: ~/.clisso.yaml)
    #[arg(long, global = true, env = "CLISSO_CONFIG")]
    pub config: Option<String>,

    /// Show debug output (overridden by CLISSO_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Get temporary credentials for an app
    ///
    /// Obtain temporary credentials for the specified app by generating a SAML
    /// assertion at the identity provider and using this assertion to retrieve
    /// temporary credentials from the cloud provider.
    ///
    /// If no app is specified, the selected app (if configured) will be assumed.
    Get {
        /// App name
        app: Option<String>,
        /// Print credentials to shell
        #[arg(long, short)]
        shell: bool,
        /// Write credentials to this file instead of the default ($HOME/.aws/credentials)
        #[arg(long, short = 'w')]
        write_to_file: Option<String>,
        /// Save password in keychain
        #[arg(long, short = 'K')]
        save_password: bool,
    },

    /// Manage apps
    Apps {
        #[command(subcommand)]
        command: AppsCommands,
    },

    /// Manage identity providers
    Providers {
        #[command(subcommand)]
        command: ProvidersCommands,
    },
}

#[derive(Subcommand)]
pub enum AppsCommands {
    /// List configured apps (* marks the selected app)
    List,
    /// Select the app `get` uses when none is given
    Select {
        /// App name
        app: String,
    },
}

#[derive(Subcommand)]
pub enum ProvidersCommands {
    /// List configured identity providers
    List,
}
