use std::path::PathBuf;

use clisso::config::{self, paths, Config};
use clisso::error::Result;

/// Resolve the config path (`--config` / `CLISSO_CONFIG`, else ~/.clisso.yaml) and load it.
pub fn load_config(config_arg: Option<&str>) -> Result<(Config, PathBuf)> {
    let path = match config_arg.filter(|p| !p.is_empty()) {
        Some(p) => paths::expand_tilde(p)?,
        None => config::default_config_path()?,
    };
    tracing::debug!(path = %path.display(), "loading config");
    let config = Config::load(&path)?;
    Ok((config, path))
}
