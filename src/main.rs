// Entrypoint for the configure tool.
// - Keeps `main` small: parse flags, set up logging, hand off to `ui::run`.
// - Every failure is logged once and mapped to its own exit code.

use clap::{CommandFactory, Parser};
use panelconf_cli::cli::{Cli, RunOptions};
use panelconf_cli::params::Registry;
use panelconf_cli::{error, ui, ConfigureError};
use tracing_subscriber::EnvFilter;

fn init_logging(debug: bool) {
    let default_filter = if debug {
        "panelconf_cli=debug,warn"
    } else {
        "panelconf_cli=info,warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

fn try_main(registry: Registry, options: RunOptions) -> anyhow::Result<()> {
    ui::run(registry, &options, &mut ui::TerminalPrompter)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // Supplied flags are validated before anything is asked or fetched.
    let registry = match cli.registry() {
        Ok(registry) => registry,
        Err(e) => {
            let code = error::report(&ConfigureError::from(e).into());
            let _ = Cli::command().print_help();
            std::process::exit(code);
        }
    };

    if let Err(err) = try_main(registry, cli.run_options()) {
        std::process::exit(error::report(&err));
    }
}
