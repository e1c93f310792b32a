//! clisso: fetch temporary cloud credentials through an identity provider.
//!
//! This library exposes the acquisition workflow and its collaborators for
//! programmatic use. The CLI is gated behind the `cli` feature and is private
//! to the binary.
//!
//! # Quick start
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use clisso::config::{default_config_path, Config};
//! use clisso::idp::ExchangeRegistry;
//! use clisso::keychain::Keychain;
//! use clisso::prompt::{Prompter, TerminalPrompter};
//! use clisso::workflow::{GetOptions, Workflow};
//!
//! let config = Config::load(&default_config_path()?)?;
//! let prompter: Rc<dyn Prompter> = Rc::new(TerminalPrompter);
//! let exchanges = ExchangeRegistry::builtin(prompter.clone());
//! let keychain = Keychain::new();
//!
//! let workflow = Workflow {
//!     config: &config,
//!     secrets: &keychain,
//!     prompter: prompter.as_ref(),
//!     exchanges: &exchanges,
//!     warn: &|message: &str| eprintln!("{}", message),
//! };
//! let opts = GetOptions {
//!     app: Some("prod".into()),
//!     shell: true,
//!     ..Default::default()
//! };
//! workflow.get(&opts, &mut std::io::stdout())?;
//! # Ok::<(), clisso::error::ClissoError>(())
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod idp;
pub mod keychain;
pub mod prompt;
pub mod workflow;
