use colored::Colorize;
use config::{ConfigError, ErrorCategory};
use errors::ConnectionError;
use std::path::Path;

#[derive(Debug)]
pub struct UxError {
    pub what: String,
    pub why: Option<String>,
    pub how_to_fix: Vec<String>,
    pub suggested_command: Option<String>,
}

impl UxError {
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            why: None,
            how_to_fix: Vec::new(),
            suggested_command: None,
        }
    }

    pub fn why(mut self, reason: impl Into<String>) -> Self {
        self.why = Some(reason.into());
        self
    }

    pub fn fix(mut self, suggestion: impl Into<String>) -> Self {
        self.how_to_fix.push(suggestion.into());
        self
    }

    pub fn suggest(mut self, cmd: impl Into<String>) -> Self {
        self.suggested_command = Some(cmd.into());
        self
    }

    pub fn display(&self) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), self.what.white().bold());

        if let Some(why) = &self.why {
            eprintln!("       {}", why.dimmed());
        }

        if !self.how_to_fix.is_empty() {
            eprintln!();
            eprintln!("{}", "How to fix:".yellow().bold());
            for (i, fix) in self.how_to_fix.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, fix);
            }
        }

        if let Some(cmd) = &self.suggested_command {
            eprintln!();
            eprintln!("{}", "Try this:".green().bold());
            eprintln!("  $ {}", cmd.cyan());
        }
        eprintln!();
    }
}

impl std::fmt::Display for UxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.what)
    }
}

impl std::error::Error for UxError {}

/// Presentation for a failure of the YAML store.
pub fn config_error(err: &ConfigError, yaml: &Path) -> UxError {
    let shown = yaml.display();
    let base = UxError::new(err.to_string());
    match err.category() {
        ErrorCategory::Io => base
            .why(format!("Could not use YAML file '{}'", shown))
            .fix("Check that the file exists and is readable and writable")
            .fix("The top level of the file must be a mapping")
            .suggest(format!("handson --yaml {} probe yaml", shown)),
        ErrorCategory::Schema => base
            .why("A stanza does not have the expected shape")
            .fix(format!("Edit '{}' or remove the stanza to restore its default", shown))
            .suggest(format!("handson --yaml {} stanza <NAME>", shown)),
        ErrorCategory::Referential => base
            .why("The cluster definition refers to roles that cannot be used")
            .fix("Each role may appear once and must be defined under role-definitions")
            .fix("'defaults' is a template, not a role")
            .suggest(format!("handson --yaml {} roles", shown)),
        ErrorCategory::Attribute => base
            .why("A role definition uses an attribute or instance type that is not allowed")
            .fix("Attributes must be keys of the 'defaults' role definition")
            .fix("Instance types must be listed in the 'types' stanza")
            .suggest(format!("handson --yaml {} stanza types", shown))
    }
}

/// Presentation for a failure to reach AWS.
pub fn connection_error(err: &ConnectionError) -> UxError {
    let base = UxError::new(err.to_string());
    match err {
        ConnectionError::MissingRegion { .. } => base
            .why("The region stanza has no region_str")
            .fix("Set region.region_str, for example to eu-west-1")
            .suggest("handson stanza region --set '{region_str: eu-west-1, availability_zone: null}'"),
        ConnectionError::ConnectFailed { .. } | ConnectionError::RequestFailed { .. } => base
            .why("The EC2 endpoint could not be reached with the current credentials")
            .fix("Check AWS_PROFILE or AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY")
            .fix("Check the region in the region stanza")
            .suggest("handson probe aws")
    }
}

pub fn invalid_yaml_value(stanza: &str, reason: &str) -> UxError {
    UxError::new(format!("Cannot parse new value for stanza '{}'", stanza))
        .why(reason.to_string())
        .fix("Pass the value as YAML text, quoted for the shell")
        .suggest(format!("handson stanza {} --set '<yaml>'", stanza))
}
