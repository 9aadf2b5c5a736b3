use log::warn;
use serde::Serialize;

use crate::runner::CommandRunner;

/// Marker gcloud prints in the IS_ACTIVE column of the active configuration.
const ACTIVE_MARKER: &str = "True";

/// One row of `gcloud config configurations list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationSummary {
    pub name: String,
    pub is_active: bool,
    pub account: Option<String>,
    pub project: Option<String>,
    pub region: Option<String>,
}

/// The settings of a single configuration that create/duplicate care about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigurationProperties {
    pub project: Option<String>,
    pub account: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Project,
    Account,
    Region,
}

impl Property {
    /// Application order when writing properties to a configuration.
    pub const ALL: [Property; 3] = [Property::Project, Property::Account, Property::Region];

    /// Key accepted by `gcloud config set`.
    pub fn key(self) -> &'static str {
        match self {
            Property::Project => "project",
            Property::Account => "account",
            Property::Region => "compute/region",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Property::Project => "Project ID",
            Property::Account => "Account Email",
            Property::Region => "Region",
        }
    }
}

impl ConfigurationProperties {
    /// Builds a bag from form fields; empty strings count as unset.
    pub fn from_fields(project: &str, account: &str, region: &str) -> Self {
        let field = |v: &str| Some(v.to_string()).filter(|v| !v.is_empty());
        Self {
            project: field(project),
            account: field(account),
            region: field(region),
        }
    }

    pub fn get(&self, property: Property) -> Option<&str> {
        match property {
            Property::Project => self.project.as_deref(),
            Property::Account => self.account.as_deref(),
            Property::Region => self.region.as_deref(),
        }
    }

    pub fn set(&mut self, property: Property, value: Option<String>) {
        let slot = match property {
            Property::Project => &mut self.project,
            Property::Account => &mut self.account,
            Property::Region => &mut self.region,
        };
        *slot = value;
    }

    /// Non-empty properties in project, account, region order.
    pub fn entries(&self) -> Vec<(Property, &str)> {
        Property::ALL
            .iter()
            .filter_map(|&p| self.get(p).filter(|v| !v.is_empty()).map(|v| (p, v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Parses the whitespace table printed by `gcloud config configurations list`.
///
/// The first line is the header and is dropped unread. Rows with fewer than two
/// columns are skipped; columns past the region are ignored.
pub fn parse_configurations(output: &str) -> Vec<ConfigurationSummary> {
    output
        .trim()
        .lines()
        .skip(1)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return None;
            }
            let column = |i: usize| parts.get(i).map(|s| s.to_string());
            Some(ConfigurationSummary {
                name: parts[0].to_string(),
                is_active: parts[1] == ACTIVE_MARKER,
                account: column(2),
                project: column(3),
                region: column(4),
            })
        })
        .collect()
}

/// Parses `gcloud config configurations describe` output into a property bag.
///
/// Lines are matched by substring; the value is whatever follows the first colon.
/// Later matches overwrite earlier ones. Never fails: unrecognised input leaves
/// fields unset.
pub fn parse_properties(output: &str) -> ConfigurationProperties {
    let mut properties = ConfigurationProperties::default();

    for line in output.lines() {
        let property = if line.contains("project:") {
            Property::Project
        } else if line.contains("account:") {
            Property::Account
        } else if line.contains("region:") {
            Property::Region
        } else {
            continue;
        };
        let value = line
            .split_once(':')
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .map(String::from);
        properties.set(property, value);
    }

    properties
}

/// Describes `name` and parses the result. A failing describe yields an empty bag.
pub fn fetch_properties(runner: &dyn CommandRunner, name: &str) -> ConfigurationProperties {
    match runner.run(&describe_args(name)) {
        Ok(output) => parse_properties(&output),
        Err(e) => {
            warn!("Could not describe configuration '{}': {}", name, e);
            ConfigurationProperties::default()
        }
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

pub fn list_args() -> Vec<String> {
    args(&["config", "configurations", "list"])
}

pub fn describe_args(name: &str) -> Vec<String> {
    args(&["config", "configurations", "describe", name])
}

pub fn create_args(name: &str) -> Vec<String> {
    args(&["config", "configurations", "create", name])
}

pub fn set_args(property: Property, value: &str, configuration: &str) -> Vec<String> {
    let binding = format!("--configuration={}", configuration);
    args(&["config", "set", property.key(), value, &binding])
}

pub fn activate_args(name: &str) -> Vec<String> {
    args(&["config", "configurations", "activate", name])
}

pub fn delete_args(name: &str) -> Vec<String> {
    args(&["config", "configurations", "delete", name, "--quiet"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fake::FakeRunner;

    const HEADER: &str = "NAME IS_ACTIVE ACCOUNT PROJECT COMPUTE_DEFAULT_REGION";

    #[test]
    fn test_parse_single_row() {
        let output = format!(
            "{}\ndefault False user@example.com my-project us-central1",
            HEADER
        );
        let configs = parse_configurations(&output);
        assert_eq!(
            configs,
            vec![ConfigurationSummary {
                name: "default".to_string(),
                is_active: false,
                account: Some("user@example.com".to_string()),
                project: Some("my-project".to_string()),
                region: Some("us-central1".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_realistic_table() {
        let output = "\
NAME     IS_ACTIVE  ACCOUNT              PROJECT      COMPUTE_DEFAULT_ZONE  COMPUTE_DEFAULT_REGION
default  True       me@example.com       prod-123
staging  False      ci@example.com       staging-9    us-east1-b            us-east1

scratch  False
";
        let configs = parse_configurations(output);
        assert_eq!(configs.len(), 3);
        assert!(configs[0].is_active);
        assert_eq!(configs[0].region, None);
        assert_eq!(configs[1].project.as_deref(), Some("staging-9"));
        // the table position, not the header, decides the column
        assert_eq!(configs[1].region.as_deref(), Some("us-east1-b"));
        assert_eq!(configs[2].account, None);
        assert_eq!(configs[2].project, None);
    }

    #[test]
    fn test_header_is_dropped_regardless_of_content() {
        let output = "default True a@b.c proj\nother False";
        let configs = parse_configurations(output);
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "other");
    }

    #[test]
    fn test_empty_and_header_only_input() {
        assert!(parse_configurations("").is_empty());
        assert!(parse_configurations(HEADER).is_empty());
        assert!(parse_configurations(&format!("{}\n\n   \n", HEADER)).is_empty());
    }

    #[test]
    fn test_single_field_rows_are_skipped() {
        let output = format!("{}\nlonely\nok False", HEADER);
        let configs = parse_configurations(&output);
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "ok");
    }

    #[test]
    fn test_active_marker_is_exact() {
        let output = format!("{}\na True\nb true\nc TRUE\nd yes\ne False", HEADER);
        let active: Vec<bool> = parse_configurations(&output)
            .iter()
            .map(|c| c.is_active)
            .collect();
        assert_eq!(active, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_parse_configurations_is_repeatable() {
        let output = format!("{}\na True x@y.z p r\nb False", HEADER);
        assert_eq!(parse_configurations(&output), parse_configurations(&output));
    }

    #[test]
    fn test_parse_describe_nested_region() {
        let output = "  account: user@example.com\n  project: my-project\n  compute:\n    region: us-west1";
        assert_eq!(
            parse_properties(output),
            ConfigurationProperties {
                project: Some("my-project".to_string()),
                account: Some("user@example.com".to_string()),
                region: Some("us-west1".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_full_describe_output() {
        let output = "\
is_active: false
name: staging
properties:
  compute:
    region: europe-west4
    zone: europe-west4-a
  core:
    account: ci@example.com
    project: staging-9
";
        let props = parse_properties(output);
        assert_eq!(props.project.as_deref(), Some("staging-9"));
        assert_eq!(props.account.as_deref(), Some("ci@example.com"));
        assert_eq!(props.region.as_deref(), Some("europe-west4"));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let props = parse_properties("name: bare\nproperties:\n  core:\n    project:\n");
        assert_eq!(props, ConfigurationProperties::default());
        assert_eq!(parse_properties("garbage without colons"), ConfigurationProperties::default());
    }

    #[test]
    fn test_last_match_wins() {
        let props = parse_properties("project: first\nproject: second\nproject:\n");
        assert_eq!(props.project, None);
        let props = parse_properties("project: first\nproject: second");
        assert_eq!(props.project.as_deref(), Some("second"));
    }

    #[test]
    fn test_value_keeps_text_after_first_colon() {
        let props = parse_properties("  account: svc:robot@example.com");
        assert_eq!(props.account.as_deref(), Some("svc:robot@example.com"));
    }

    #[test]
    fn test_reparse_of_reconstruction_is_stable() {
        let parsed = parse_properties("  account:  a@b.c \n project: p1\n  region:   r1  ");
        let rebuilt: String = parsed
            .entries()
            .iter()
            .map(|(p, v)| format!("{}: {}\n", p.key().trim_start_matches("compute/"), v))
            .collect();
        assert_eq!(parse_properties(&rebuilt), parsed);
    }

    #[test]
    fn test_fetch_properties_swallows_failure() {
        let runner = FakeRunner::new().fail("config configurations describe gone", "boom");
        assert_eq!(
            fetch_properties(&runner, "gone"),
            ConfigurationProperties::default()
        );
        assert_eq!(runner.calls(), vec!["config configurations describe gone"]);
    }

    #[test]
    fn test_fetch_properties_parses_output() {
        let runner = FakeRunner::new().reply(
            "config configurations describe dev",
            "properties:\n  core:\n    project: dev-1\n",
        );
        assert_eq!(fetch_properties(&runner, "dev").project.as_deref(), Some("dev-1"));
    }

    #[test]
    fn test_entries_follow_fixed_order_and_skip_empty() {
        let props = ConfigurationProperties::from_fields("p", "", "r");
        assert_eq!(
            props.entries(),
            vec![(Property::Project, "p"), (Property::Region, "r")]
        );
        assert!(ConfigurationProperties::from_fields("", "", "").is_empty());
    }

    #[test]
    fn test_command_shapes() {
        assert_eq!(list_args().join(" "), "config configurations list");
        assert_eq!(describe_args("a").join(" "), "config configurations describe a");
        assert_eq!(create_args("a").join(" "), "config configurations create a");
        assert_eq!(activate_args("a").join(" "), "config configurations activate a");
        assert_eq!(
            delete_args("a").join(" "),
            "config configurations delete a --quiet"
        );
        assert_eq!(
            set_args(Property::Region, "us-east1", "a"),
            vec!["config", "set", "compute/region", "us-east1", "--configuration=a"]
        );
    }
}
