//! The option catalog: every recognized global option, its type, default and
//! display rules.
//!
//! The order of [`CATALOG`] is the canonical display order. Both the listing
//! printed by `ddev config global` and the flags it accepts are generated from
//! this table, so adding an option here (plus its field on
//! [`GlobalConfig`](crate::config::GlobalConfig)) is all that is needed to
//! expose it.

use crate::constants::{DEFAULT_INTERNET_DETECTION_TIMEOUT_MS, DEFAULT_TABLE_STYLE};
use crate::utils::validation;
use serde::Serialize;
use std::fmt;

/// Semantic type of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Str,
    Int,
    /// Ordered list of unique strings
    List,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Bool => "boolean",
            OptionKind::Str => "string",
            OptionKind::Int => "integer",
            OptionKind::List => "list",
        };
        f.write_str(name)
    }
}

/// How a list option is shown in the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDisplay {
    /// `[a,b]` in stored order
    Bare,
    /// `["a","b"]` sorted, for environment-style entries
    QuotedSorted,
}

/// A typed option value, as read from or written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::Int(_) => OptionKind::Int,
            OptionValue::Str(_) => OptionKind::Str,
            OptionValue::List(_) => OptionKind::List,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{v}"),
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Str(v) => f.write_str(v),
            OptionValue::List(v) => write!(f, "[{}]", v.join(",")),
        }
    }
}

/// Compile-time default of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Str(&'static str),
    EmptyList,
}

impl DefaultValue {
    pub fn to_value(self) -> OptionValue {
        match self {
            DefaultValue::Bool(v) => OptionValue::Bool(v),
            DefaultValue::Int(v) => OptionValue::Int(v),
            DefaultValue::Str(v) => OptionValue::Str(v.to_string()),
            DefaultValue::EmptyList => OptionValue::List(Vec::new()),
        }
    }
}

/// Checks a single string value (or list entry), returning the reason on failure
pub type Validator = fn(&str) -> Result<(), String>;

/// One row of the option catalog
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    /// Kebab-case key, also the long flag name
    pub name: &'static str,
    pub kind: OptionKind,
    pub default: DefaultValue,
    /// Long flag for appending to a list option
    pub append_flag: Option<&'static str>,
    pub list_display: ListDisplay,
    pub validator: Option<Validator>,
    pub help: &'static str,
}

impl OptionSpec {
    const fn new(
        name: &'static str,
        kind: OptionKind,
        default: DefaultValue,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            default,
            append_flag: None,
            list_display: ListDisplay::Bare,
            validator: None,
            help,
        }
    }

    const fn flag(name: &'static str, help: &'static str) -> Self {
        Self::new(name, OptionKind::Bool, DefaultValue::Bool(false), help)
    }

    const fn text(name: &'static str, default: &'static str, help: &'static str) -> Self {
        Self::new(name, OptionKind::Str, DefaultValue::Str(default), help)
    }

    const fn list(name: &'static str, append_flag: &'static str, help: &'static str) -> Self {
        let mut spec = Self::new(name, OptionKind::List, DefaultValue::EmptyList, help);
        spec.append_flag = Some(append_flag);
        spec
    }

    const fn display(mut self, list_display: ListDisplay) -> Self {
        self.list_display = list_display;
        self
    }

    const fn validated(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Check one string value or list entry: single line, then the option's validator
    pub fn check_entry(&self, value: &str) -> Result<(), String> {
        validation::validate_single_line(value)?;
        match self.validator {
            Some(check) => check(value),
            None => Ok(()),
        }
    }

    /// Check a typed value against every rule of the option
    pub fn check(&self, value: &OptionValue) -> Result<(), String> {
        match value {
            OptionValue::Int(number) if *number < 0 => Err("must not be negative".to_string()),
            OptionValue::Str(text) => self.check_entry(text),
            OptionValue::List(entries) => entries.iter().try_for_each(|entry| {
                self.check_entry(entry)
                    .map_err(|reason| format!("entry '{entry}': {reason}"))
            }),
            _ => Ok(()),
        }
    }

    /// Format a value the way it appears after `name=` in the listing
    pub fn render_value(&self, value: &OptionValue) -> String {
        match value {
            OptionValue::List(entries) => match self.list_display {
                ListDisplay::Bare => format!("[{}]", entries.join(",")),
                ListDisplay::QuotedSorted => {
                    let mut sorted: Vec<&String> = entries.iter().collect();
                    sorted.sort();
                    let quoted: Vec<String> = sorted.into_iter().map(|e| quote(e)).collect();
                    format!("[{}]", quoted.join(","))
                }
            },
            other => other.to_string(),
        }
    }
}

fn quote(entry: &str) -> String {
    format!("\"{}\"", entry.replace('\\', "\\\\").replace('"', "\\\""))
}

/// All global options, in display order
pub static CATALOG: &[OptionSpec] = &[
    OptionSpec::flag("instrumentation-opt-in", "Share anonymous usage statistics"),
    OptionSpec::list(
        "omit-containers",
        "omit-containers-add",
        "Containers that should not be started (dba, ddev-ssh-agent, ddev-router)",
    )
    .validated(validation::validate_omittable_container),
    OptionSpec::list(
        "web-environment",
        "web-environment-add",
        "Environment variables passed to every web container, as KEY=value",
    )
    .display(ListDisplay::QuotedSorted),
    OptionSpec::flag("mutagen-enabled", "Use mutagen for file syncing"),
    OptionSpec::flag("nfs-mount-enabled", "Use NFS for the project mount"),
    OptionSpec::flag(
        "router-bind-all-interfaces",
        "Bind the router to all network interfaces",
    ),
    OptionSpec::new(
        "internet-detection-timeout-ms",
        OptionKind::Int,
        DefaultValue::Int(DEFAULT_INTERNET_DETECTION_TIMEOUT_MS),
        "Milliseconds to wait when checking for internet access",
    ),
    OptionSpec::flag("disable-http2", "Serve over HTTP/1.1 only"),
    OptionSpec::flag("use-letsencrypt", "Request certificates from Let's Encrypt"),
    OptionSpec::text(
        "letsencrypt-email",
        "",
        "Contact email used for Let's Encrypt",
    ),
    OptionSpec::text(
        "table-style",
        DEFAULT_TABLE_STYLE,
        "Table style for list output (default, bold, bright)",
    )
    .validated(validation::validate_table_style),
    OptionSpec::flag("simple-formatting", "Disable table formatting and colors"),
    OptionSpec::flag(
        "auto-restart-containers",
        "Restart running containers after a reboot",
    ),
    OptionSpec::flag("use-hardened-images", "Use hardened container images"),
    OptionSpec::flag("fail-on-hook-fail", "Abort when a hook command fails"),
    OptionSpec::text(
        "required-docker-compose-version",
        "",
        "Pin the docker-compose version to download",
    ),
    OptionSpec::flag(
        "use-docker-compose-from-path",
        "Use the docker-compose found in $PATH",
    ),
    OptionSpec::text("project-tld", "", "Default top-level domain for projects"),
    OptionSpec::text(
        "xdebug-ide-location",
        "",
        "Where the IDE listens for xdebug (container, wsl2 or an IP address)",
    )
    .validated(validation::validate_xdebug_ide_location),
];

/// Look up an option by its kebab-case name
pub fn find(name: &str) -> Option<&'static OptionSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

/// Look up the list option whose append flag is `flag`
pub fn find_by_append_flag(flag: &str) -> Option<&'static OptionSpec> {
    CATALOG.iter().find(|spec| spec.append_flag == Some(flag))
}
