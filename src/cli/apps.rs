use crate::cli::common;
use crate::cli::AppsCommands;
use clisso::config::ConfigStore;
use clisso::error::Result;

pub fn run(config_arg: Option<&str>, cmd: &AppsCommands) -> Result<()> {
    match cmd {
        AppsCommands::List => list(config_arg),
        AppsCommands::Select { app } => select(config_arg, app),
    }
}

fn list(config_arg: Option<&str>) -> Result<()> {
    let (config, _) = common::load_config(config_arg)?;
    let selected = config.selected_app();

    for name in config.apps.keys() {
        let marker = if selected.as_deref() == Some(name.as_str()) {
            "*"
        } else {
            " "
        };
        let provider = config
            .provider_for_app(name)
            .unwrap_or_else(|| "-".to_string());
        println!("{} {} ({})", marker, name, provider);
    }
    Ok(())
}

fn select(config_arg: Option<&str>, app: &str) -> Result<()> {
    let (mut config, path) = common::load_config(config_arg)?;
    config.select_app(app)?;
    config.save(&path)?;
    eprintln!("App '{}' selected.", app);
    Ok(())
}
