mod cli;
mod commands;
mod config;
mod configuration;
mod flows;
mod runner;
mod surface;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use configuration::ConfigurationProperties;
use flows::{CreateForm, Outcome};
use log::debug;
use runner::GcloudRunner;
use std::process::ExitCode;
use surface::TerminalSurface;

fn run(cli: Cli) -> Result<Outcome> {
    let command = cli.command.unwrap_or(Commands::Interactive);

    let assume_yes = matches!(command, Commands::Delete { yes: true, .. });
    let config = Config::new(cli.gcloud).with_assume_yes(assume_yes);
    let surface = TerminalSurface::new(config.assume_yes);
    let runner = GcloudRunner::new(config);

    let outcome = match command {
        Commands::Interactive => commands::interactive(&runner, &surface)?,
        Commands::List { format } => commands::list(&runner, &surface, format)?,
        Commands::Current => commands::current(&runner, &surface)?,
        Commands::Describe { name } => commands::describe(&runner, &name)?,
        Commands::Activate { name } => commands::activate(&runner, &surface, &name)?,
        Commands::Delete { name, .. } => commands::delete(&runner, &surface, &name)?,
        Commands::Create { name, project, account, region } => {
            let form = name.map(|name| CreateForm {
                name,
                project: project.unwrap_or_default(),
                account: account.unwrap_or_default(),
                region: region.unwrap_or_default(),
            });
            commands::create(&runner, &surface, form)?
        }
        Commands::Duplicate { source, new_name, mode, project, account, region } => {
            let overrides = ConfigurationProperties::from_fields(
                project.as_deref().unwrap_or(""),
                account.as_deref().unwrap_or(""),
                region.as_deref().unwrap_or(""),
            );
            commands::check_duplicate_flags(mode, &overrides)?;
            let args = commands::DuplicateArgs { source, new_name, mode, overrides };
            commands::duplicate(&runner, &surface, args)?
        }
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    Ok(outcome)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();
    debug!("Starting gcfg v{}", env!("CARGO_PKG_VERSION"));

    let outcome = run(cli)?;
    debug!("Finished with {:?}", outcome);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
