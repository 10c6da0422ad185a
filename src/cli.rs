// Command-line surface. `clap` handles the flag schema; the values it
// collects are then run through the parameter registry's validators so a
// bad flag fails the whole parse before any prompt or network activity.

use crate::params::{
    ParamKey, ParamValue, Registry, ValidationError, OVERWRITE_SHORT, PANEL_URL_SHORT, TOKEN_SHORT,
};
use crate::store::DEFAULT_CONFIG_PATH;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "panelconf-cli", version)]
#[command(about = "Fetch this node's core configuration from the panel and write it locally")]
pub struct Cli {
    /// Panel URL, e.g. https://panel.example.com
    #[arg(short = PANEL_URL_SHORT, long = "panel-url", value_name = "URL")]
    pub panel_url: Option<String>,

    /// 32-character configuration token issued by the panel
    #[arg(short = TOKEN_SHORT, long = "token", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Replace an existing configuration file without asking
    #[arg(short = OVERWRITE_SHORT, long = "overwrite")]
    pub overwrite: bool,

    /// Where to write the configuration
    #[arg(long, value_name = "FILE", env = "PANELCONF_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config_path: PathBuf,

    /// Give up on the panel after this many seconds (default: wait forever)
    #[arg(long, value_name = "SECONDS", env = "PANELCONF_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(long, env = "PANELCONF_DEBUG")]
    pub debug: bool,
}

/// Settings for a run that are not prompted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub timeout: Option<Duration>,
}

impl Cli {
    /// Build a registry from the supplied flags. Every supplied value is
    /// validated; any rejection discards the whole registry. Flags that were
    /// not given stay unset for the prompter.
    pub fn registry(&self) -> Result<Registry, ValidationError> {
        let mut registry = Registry::new();
        if let Some(url) = &self.panel_url {
            registry.set(ParamKey::PanelUrl, ParamValue::Text(url.clone()))?;
        }
        if let Some(token) = &self.token {
            registry.set(ParamKey::Token, ParamValue::Text(token.clone()))?;
        }
        if self.overwrite {
            registry.set(ParamKey::Overwrite, ParamValue::Flag(true))?;
        }
        Ok(registry)
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            config_path: self.config_path.clone(),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}
