use std::io;
use std::rc::Rc;

use console::style;

use crate::cli::common;
use clisso::credentials::Delivered;
use clisso::error::Result;
use clisso::idp::ExchangeRegistry;
use clisso::keychain::Keychain;
use clisso::prompt::{Prompter, TerminalPrompter};
use clisso::workflow::{GetOptions, Workflow};

pub fn run(config_arg: Option<&str>, opts: &GetOptions) -> Result<()> {
    let (config, _) = common::load_config(config_arg)?;

    let prompter: Rc<dyn Prompter> = Rc::new(TerminalPrompter);
    let exchanges = ExchangeRegistry::builtin(prompter.clone());
    let keychain = Keychain::new();
    let warn = |message: &str| eprintln!("{}", style(message).yellow());

    let workflow = Workflow {
        config: &config,
        secrets: &keychain,
        prompter: prompter.as_ref(),
        exchanges: &exchanges,
        warn: &warn,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = workflow.get(opts, &mut out)?;

    if let Delivered::File(path) = &outcome.delivered {
        eprintln!(
            "{}",
            style(format!(
                "Credentials written successfully to '{}'",
                path.display()
            ))
            .green()
        );
    }
    Ok(())
}
