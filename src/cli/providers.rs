use crate::cli::common;
use crate::cli::ProvidersCommands;
use clisso::config::ConfigStore;
use clisso::error::Result;

pub fn run(config_arg: Option<&str>, cmd: &ProvidersCommands) -> Result<()> {
    match cmd {
        ProvidersCommands::List => list(config_arg),
    }
}

fn list(config_arg: Option<&str>) -> Result<()> {
    let (config, _) = common::load_config(config_arg)?;
    for name in config.providers.keys() {
        let provider_type = config
            .type_for_provider(name)
            .unwrap_or_else(|| "?".to_string());
        println!("{} ({})", name, provider_type);
    }
    Ok(())
}
