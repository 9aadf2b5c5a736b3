use anyhow::{bail, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::io;

use crate::cli::{Cli, DuplicateMode, OutputFormat};
use crate::configuration::{fetch_properties, ConfigurationProperties, ConfigurationSummary, Property};
use crate::flows::{CreateFlow, CreateForm, DuplicateFlow, DuplicateForm, ListFlow, Outcome};
use crate::runner::CommandRunner;
use crate::surface::Surface;

/// Region offered by the interactive create form.
const DEFAULT_REGION: &str = "us-central1";

fn print_table(configs: &[ConfigurationSummary]) {
    if configs.is_empty() {
        println!("{}", "No configurations found. Run 'gcfg create' to add one.".yellow());
        return;
    }

    println!("{}", "Configurations:".bold());
    for config in configs {
        let marker = if config.is_active { "→".green() } else { " ".normal() };
        let name = if config.is_active {
            config.name.green().bold()
        } else {
            config.name.normal()
        };
        let project = match &config.project {
            Some(p) => p.cyan(),
            None => "No project set".dimmed(),
        };
        println!(
            "  {} {:<20} {:<24} {} {}",
            marker,
            name,
            project,
            config.account.as_deref().unwrap_or("").normal(),
            config.region.as_deref().unwrap_or("").dimmed(),
        );
    }
}

fn print_name_error(error: Option<&str>) -> Outcome {
    if let Some(error) = error {
        eprintln!("{} {}", "!".yellow(), error.yellow());
    }
    Outcome::Invalid
}

pub fn list(runner: &dyn CommandRunner, surface: &dyn Surface, format: OutputFormat) -> Result<Outcome> {
    let mut flow = ListFlow::new(runner, surface);
    let outcome = flow.load();
    if outcome != Outcome::Completed {
        return Ok(outcome);
    }

    match format {
        OutputFormat::Table => print_table(flow.configs()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(flow.configs())?),
    }
    Ok(outcome)
}

pub fn current(runner: &dyn CommandRunner, surface: &dyn Surface) -> Result<Outcome> {
    let mut flow = ListFlow::new(runner, surface);
    let outcome = flow.load();
    if outcome != Outcome::Completed {
        return Ok(outcome);
    }

    match flow.active() {
        Some(config) => println!("{}", config.name.green().bold()),
        None => println!("{}", "No active configuration.".yellow()),
    }
    Ok(outcome)
}

pub fn describe(runner: &dyn CommandRunner, name: &str) -> Result<Outcome> {
    let properties = fetch_properties(runner, name);

    println!("{}", name.bold());
    for property in Property::ALL {
        let value = match properties.get(property) {
            Some(v) => v.cyan(),
            None => "(not set)".dimmed(),
        };
        println!("  {:<14} {}", property.label(), value);
    }
    Ok(Outcome::Completed)
}

pub fn activate(runner: &dyn CommandRunner, surface: &dyn Surface, name: &str) -> Result<Outcome> {
    Ok(ListFlow::new(runner, surface).activate(name))
}

pub fn delete(runner: &dyn CommandRunner, surface: &dyn Surface, name: &str) -> Result<Outcome> {
    let outcome = ListFlow::new(runner, surface).delete(name);
    if outcome == Outcome::Cancelled {
        println!("Cancelled");
    }
    Ok(outcome)
}

fn prompt(label: &str, initial: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

pub fn create(runner: &dyn CommandRunner, surface: &dyn Surface, form: Option<CreateForm>) -> Result<Outcome> {
    let mut flow = CreateFlow::new(runner, surface);

    let form = match form {
        Some(form) => form,
        None => {
            let name = prompt("Configuration Name", "")?;
            flow.check_name(&name);
            if flow.name_error().is_some() {
                return Ok(print_name_error(flow.name_error()));
            }
            CreateForm {
                name,
                project: prompt(Property::Project.label(), "")?,
                account: prompt(Property::Account.label(), "")?,
                region: prompt(Property::Region.label(), DEFAULT_REGION)?,
            }
        }
    };

    let outcome = flow.submit(&form);
    if outcome == Outcome::Invalid {
        return Ok(print_name_error(flow.name_error()));
    }
    Ok(outcome)
}

fn pick_configuration(configs: &[ConfigurationSummary], prompt: &str) -> Result<Option<String>> {
    if configs.is_empty() {
        return Ok(None);
    }

    let items: Vec<String> = configs
        .iter()
        .map(|c| match &c.project {
            Some(p) => format!("{} ({})", c.name, p),
            None => c.name.clone(),
        })
        .collect();
    let default = configs.iter().position(|c| c.is_active).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact_opt()?;
    Ok(selection.map(|idx| configs[idx].name.clone()))
}

pub struct DuplicateArgs {
    pub source: Option<String>,
    pub new_name: Option<String>,
    pub mode: DuplicateMode,
    pub overrides: ConfigurationProperties,
}

pub fn duplicate(runner: &dyn CommandRunner, surface: &dyn Surface, args: DuplicateArgs) -> Result<Outcome> {
    let mut flow = DuplicateFlow::new(runner, surface, args.mode);

    let source = match args.source {
        Some(source) => source,
        None => {
            if flow.load() != Outcome::Completed {
                return Ok(Outcome::Failed);
            }
            pick_configuration(flow.configs(), "Source Configuration")?.unwrap_or_default()
        }
    };

    let interactive = args.new_name.is_none();
    let new_name = match args.new_name {
        Some(name) => name,
        None => prompt("New Configuration Name", "")?,
    };
    // Picking the source may describe it, so the name is checked first.
    flow.check_name(&new_name);
    if flow.name_error().is_some() {
        return Ok(print_name_error(flow.name_error()));
    }

    let mut properties = flow.select_source(&source);
    if flow.mode() == DuplicateMode::Edit {
        for property in Property::ALL {
            if let Some(value) = args.overrides.get(property) {
                properties.set(property, Some(value.to_string()));
            }
        }
        if interactive && !source.is_empty() {
            let project = prompt(Property::Project.label(), properties.project.as_deref().unwrap_or(""))?;
            let account = prompt(Property::Account.label(), properties.account.as_deref().unwrap_or(""))?;
            let region = prompt(Property::Region.label(), properties.region.as_deref().unwrap_or(""))?;
            properties = ConfigurationProperties::from_fields(&project, &account, &region);
        }
    }

    let outcome = flow.submit(&DuplicateForm {
        source,
        new_name,
        properties,
    });
    if outcome == Outcome::Invalid && flow.name_error().is_some() {
        return Ok(print_name_error(flow.name_error()));
    }
    Ok(outcome)
}

/// Outcome of an interactive session: any failed action fails the whole session.
fn session_outcome(failed: bool, last: Outcome) -> Outcome {
    if failed {
        Outcome::Failed
    } else {
        last
    }
}

pub fn interactive(runner: &dyn CommandRunner, surface: &dyn Surface) -> Result<Outcome> {
    let mut flow = ListFlow::new(runner, surface);
    if flow.is_loading() {
        eprintln!("{}", "Loading configurations...".dimmed());
    }
    if flow.load() != Outcome::Completed {
        return Ok(Outcome::Failed);
    }

    let mut failed = false;
    loop {
        if flow.configs().is_empty() {
            println!("{}", "No configurations found. Run 'gcfg create' to add one.".yellow());
            return Ok(session_outcome(failed, Outcome::Completed));
        }

        let selected = match pick_configuration(flow.configs(), "Select configuration")? {
            Some(name) => name,
            None => {
                println!("Cancelled");
                return Ok(session_outcome(failed, Outcome::Cancelled));
            }
        };
        let is_active = flow.active().map_or(false, |c| c.name == selected);

        let activate_label = if is_active { "Already Active" } else { "Activate Configuration" };
        let actions = [activate_label, "Delete Configuration", "Refresh", "Quit"];
        let action = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{}", selected.cyan()))
            .items(&actions)
            .default(0)
            .interact_opt()?;

        match action {
            Some(0) if is_active => {
                println!("{} Already on '{}'", "·".dimmed(), selected.cyan());
                return Ok(session_outcome(failed, Outcome::Completed));
            }
            Some(0) => return Ok(session_outcome(failed, flow.activate(&selected))),
            Some(1) => failed |= flow.delete(&selected) == Outcome::Failed,
            Some(2) => failed |= flow.load() == Outcome::Failed,
            _ => return Ok(session_outcome(failed, Outcome::Cancelled)),
        }
    }
}

pub fn completions(shell: Shell) -> Result<Outcome> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(Outcome::Completed)
}

/// Rejects property flags that snapshot mode would silently ignore.
pub fn check_duplicate_flags(mode: DuplicateMode, overrides: &ConfigurationProperties) -> Result<()> {
    if mode == DuplicateMode::Snapshot && !overrides.is_empty() {
        bail!("--project, --account and --region require --mode edit");
    }
    Ok(())
}
