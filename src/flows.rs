//! The list, create and duplicate flows.
//!
//! Each flow owns a small state record and drives gcloud through a
//! [`CommandRunner`], reporting every terminal outcome through a [`Surface`].
//! Command failures never escape a flow; they become failure notices.

use anyhow::Result;
use log::{debug, info};

use crate::cli::DuplicateMode;
use crate::configuration::{
    activate_args, create_args, delete_args, fetch_properties, list_args, parse_configurations,
    set_args, ConfigurationProperties, ConfigurationSummary,
};
use crate::runner::CommandRunner;
use crate::surface::{NoticeStyle, Surface};

pub const NAME_REQUIRED: &str = "Configuration name is required";
pub const NEW_NAME_REQUIRED: &str = "New configuration name is required";

/// How a flow action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The user declined a confirmation; nothing was issued.
    Cancelled,
    /// Rejected before any command was issued.
    Invalid,
    /// A gcloud command failed and a failure notice was shown.
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Completed | Outcome::Cancelled)
    }
}

fn failure_message(err: &anyhow::Error) -> String {
    format!("{:#}", err)
}

/// Loads the listing, reporting a failure notice when gcloud fails.
fn load_configurations(
    runner: &dyn CommandRunner,
    surface: &dyn Surface,
) -> Option<Vec<ConfigurationSummary>> {
    match runner.run(&list_args()) {
        Ok(output) => {
            let configs = parse_configurations(&output);
            debug!("Loaded {} configurations", configs.len());
            Some(configs)
        }
        Err(e) => {
            surface.notify(
                NoticeStyle::Failure,
                "Failed to load configurations",
                &failure_message(&e),
            );
            None
        }
    }
}

/// Creates `name`, then sets each non-empty property in project, account, region order.
/// Stops at the first failure; whatever was already applied stays applied.
fn create_with_properties(
    runner: &dyn CommandRunner,
    name: &str,
    properties: &ConfigurationProperties,
) -> Result<()> {
    runner.run(&create_args(name))?;
    for (property, value) in properties.entries() {
        runner.run(&set_args(property, value, name))?;
    }
    Ok(())
}

pub struct ListFlow<'a> {
    runner: &'a dyn CommandRunner,
    surface: &'a dyn Surface,
    configs: Vec<ConfigurationSummary>,
    loading: bool,
}

impl<'a> ListFlow<'a> {
    pub fn new(runner: &'a dyn CommandRunner, surface: &'a dyn Surface) -> Self {
        Self {
            runner,
            surface,
            configs: Vec::new(),
            loading: true,
        }
    }

    pub fn configs(&self) -> &[ConfigurationSummary] {
        &self.configs
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn active(&self) -> Option<&ConfigurationSummary> {
        self.configs.iter().find(|c| c.is_active)
    }

    /// Replaces the listing on success; keeps the previous one on failure.
    pub fn load(&mut self) -> Outcome {
        self.loading = true;
        let outcome = match load_configurations(self.runner, self.surface) {
            Some(configs) => {
                self.configs = configs;
                Outcome::Completed
            }
            None => Outcome::Failed,
        };
        self.loading = false;
        outcome
    }

    pub fn activate(&mut self, name: &str) -> Outcome {
        if let Err(e) = self.runner.run(&activate_args(name)) {
            self.surface.notify(
                NoticeStyle::Failure,
                "Failed to activate configuration",
                &failure_message(&e),
            );
            return Outcome::Failed;
        }

        info!("Activated configuration '{}'", name);
        self.surface.notify(
            NoticeStyle::Success,
            "Configuration activated",
            &format!("Switched to {}", name),
        );
        self.load();
        Outcome::Completed
    }

    pub fn delete(&mut self, name: &str) -> Outcome {
        let confirmed = self.surface.confirm(
            "Delete Configuration",
            &format!("Are you sure you want to delete \"{}\"?", name),
            "Delete",
        );
        if !confirmed {
            debug!("Deletion of '{}' declined", name);
            return Outcome::Cancelled;
        }

        if let Err(e) = self.runner.run(&delete_args(name)) {
            self.surface.notify(
                NoticeStyle::Failure,
                "Failed to delete configuration",
                &failure_message(&e),
            );
            return Outcome::Failed;
        }

        info!("Deleted configuration '{}'", name);
        self.surface.notify(
            NoticeStyle::Success,
            "Configuration deleted",
            &format!("Deleted {}", name),
        );
        self.load();
        Outcome::Completed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub name: String,
    pub project: String,
    pub account: String,
    pub region: String,
}

pub struct CreateFlow<'a> {
    runner: &'a dyn CommandRunner,
    surface: &'a dyn Surface,
    name_error: Option<String>,
}

impl<'a> CreateFlow<'a> {
    pub fn new(runner: &'a dyn CommandRunner, surface: &'a dyn Surface) -> Self {
        Self {
            runner,
            surface,
            name_error: None,
        }
    }

    pub fn name_error(&self) -> Option<&str> {
        self.name_error.as_deref()
    }

    /// Field-level check run as the user leaves the name field.
    pub fn check_name(&mut self, value: &str) {
        self.name_error = value.is_empty().then(|| NAME_REQUIRED.to_string());
    }

    pub fn submit(&mut self, form: &CreateForm) -> Outcome {
        if form.name.is_empty() {
            self.name_error = Some(NAME_REQUIRED.to_string());
            return Outcome::Invalid;
        }
        self.name_error = None;

        let properties =
            ConfigurationProperties::from_fields(&form.project, &form.account, &form.region);
        if let Err(e) = create_with_properties(self.runner, &form.name, &properties) {
            self.surface.notify(
                NoticeStyle::Failure,
                "Failed to create configuration",
                &failure_message(&e),
            );
            return Outcome::Failed;
        }

        info!("Created configuration '{}'", form.name);
        self.surface.notify(
            NoticeStyle::Success,
            "Configuration created",
            &format!("Created configuration: {}", form.name),
        );
        self.surface.pop_to_root();
        Outcome::Completed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateForm {
    pub source: String,
    pub new_name: String,
    /// Editable values; only consulted in [`DuplicateMode::Edit`].
    pub properties: ConfigurationProperties,
}

pub struct DuplicateFlow<'a> {
    runner: &'a dyn CommandRunner,
    surface: &'a dyn Surface,
    mode: DuplicateMode,
    configs: Vec<ConfigurationSummary>,
    name_error: Option<String>,
}

impl<'a> DuplicateFlow<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        surface: &'a dyn Surface,
        mode: DuplicateMode,
    ) -> Self {
        Self {
            runner,
            surface,
            mode,
            configs: Vec::new(),
            name_error: None,
        }
    }

    pub fn mode(&self) -> DuplicateMode {
        self.mode
    }

    /// Candidates for the source picker.
    pub fn configs(&self) -> &[ConfigurationSummary] {
        &self.configs
    }

    pub fn name_error(&self) -> Option<&str> {
        self.name_error.as_deref()
    }

    pub fn check_name(&mut self, value: &str) {
        self.name_error = value.is_empty().then(|| NEW_NAME_REQUIRED.to_string());
    }

    pub fn load(&mut self) -> Outcome {
        match load_configurations(self.runner, self.surface) {
            Some(configs) => {
                self.configs = configs;
                Outcome::Completed
            }
            None => Outcome::Failed,
        }
    }

    /// Values to pre-fill once `source` is picked. Only edit mode looks them up;
    /// snapshot mode reads the source at submit time instead.
    pub fn select_source(&self, source: &str) -> ConfigurationProperties {
        match self.mode {
            DuplicateMode::Edit if !source.is_empty() => fetch_properties(self.runner, source),
            _ => ConfigurationProperties::default(),
        }
    }

    pub fn submit(&mut self, form: &DuplicateForm) -> Outcome {
        if form.new_name.is_empty() {
            self.name_error = Some(NEW_NAME_REQUIRED.to_string());
            return Outcome::Invalid;
        }
        self.name_error = None;

        if form.source.is_empty() {
            self.surface.notify(
                NoticeStyle::Failure,
                "Source configuration required",
                "Please select a configuration to duplicate",
            );
            return Outcome::Invalid;
        }

        let properties = match self.mode {
            DuplicateMode::Snapshot => fetch_properties(self.runner, &form.source),
            DuplicateMode::Edit => form.properties.clone(),
        };

        if let Err(e) = create_with_properties(self.runner, &form.new_name, &properties) {
            self.surface.notify(
                NoticeStyle::Failure,
                "Failed to duplicate configuration",
                &failure_message(&e),
            );
            return Outcome::Failed;
        }

        info!(
            "Duplicated configuration '{}' as '{}'",
            form.source, form.new_name
        );
        self.surface.notify(
            NoticeStyle::Success,
            "Configuration duplicated",
            &format!("Created {} from {}", form.new_name, form.source),
        );
        self.surface.pop_to_root();
        Outcome::Completed
    }
}
