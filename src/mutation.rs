//! Applies batches of option operations to a [`GlobalConfig`].
//!
//! A batch is all-or-nothing: operations run in order against a working copy,
//! and the first failure discards the copy so the caller's store is never
//! partially updated. For every operation the option name is resolved against
//! the catalog first, then the value is parsed and validated, and only then is
//! the working copy touched.

use crate::catalog::{self, OptionKind, OptionSpec, OptionValue};
use crate::config::GlobalConfig;
use crate::error::ConfigError;

/// One requested change to a named option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Replace a bool, string or integer option. A bool with no value means `true`.
    SetScalar { name: String, value: Option<String> },
    /// Replace a list option with a comma separated list; `""` clears it
    SetList { name: String, value: String },
    /// Union entries into a list option, keeping existing order
    AppendList { name: String, value: String },
}

impl Operation {
    pub fn set(name: &str, value: &str) -> Self {
        Operation::SetScalar {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    pub fn flag(name: &str) -> Self {
        Operation::SetScalar {
            name: name.to_string(),
            value: None,
        }
    }

    pub fn set_list(name: &str, value: &str) -> Self {
        Operation::SetList {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn append(name: &str, value: &str) -> Self {
        Operation::AppendList {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Operation::SetScalar { name, .. }
            | Operation::SetList { name, .. }
            | Operation::AppendList { name, .. } => name,
        }
    }
}

/// Apply `operations` in order to a copy of `config`.
///
/// Returns the updated copy, or the first error; `config` itself is never
/// modified.
pub fn apply(config: &GlobalConfig, operations: &[Operation]) -> Result<GlobalConfig, ConfigError> {
    let mut working = config.clone();
    for operation in operations {
        apply_one(&mut working, operation)?;
        log::debug!("Applied {operation:?}");
    }
    Ok(working)
}

fn apply_one(config: &mut GlobalConfig, operation: &Operation) -> Result<(), ConfigError> {
    let spec = catalog::find(operation.name()).ok_or_else(|| ConfigError::UnknownOption {
        name: operation.name().to_string(),
    })?;

    let value = match operation {
        Operation::SetScalar { value, .. } => parse_scalar(spec, value.as_deref())?,
        Operation::SetList { value, .. } => OptionValue::List(parse_list(spec, value)?),
        Operation::AppendList { value, .. } => {
            let additions = parse_list(spec, value)?;
            let mut entries = match config.get(spec.name) {
                Some(OptionValue::List(entries)) => entries,
                _ => Vec::new(),
            };
            union_into(&mut entries, additions);
            OptionValue::List(entries)
        }
    };

    config.set(spec.name, value)
}

fn parse_scalar(spec: &OptionSpec, value: Option<&str>) -> Result<OptionValue, ConfigError> {
    let name = spec.name;
    let parsed = match (spec.kind, value) {
        (OptionKind::Bool, None) => OptionValue::Bool(true),
        (OptionKind::Bool, Some(raw)) => match raw {
            "true" => OptionValue::Bool(true),
            "false" => OptionValue::Bool(false),
            _ => return Err(ConfigError::invalid(name, raw, "expected 'true' or 'false'")),
        },
        (OptionKind::Int, Some(raw)) => {
            let number = raw
                .parse::<i64>()
                .map_err(|e| ConfigError::invalid(name, raw, format!("not an integer: {e}")))?;
            OptionValue::Int(number)
        }
        (OptionKind::Str, Some(raw)) => OptionValue::Str(unquote(raw).to_string()),
        (OptionKind::List, Some(raw)) => {
            return Err(ConfigError::invalid(
                name,
                raw,
                "list options are replaced or appended to, not set as a scalar",
            ));
        }
        (kind, None) => {
            return Err(ConfigError::invalid(name, "", format!("a {kind} option requires a value")));
        }
    };

    spec.check(&parsed)
        .map_err(|reason| ConfigError::invalid(name, value.unwrap_or_default(), reason))?;
    Ok(parsed)
}

fn parse_list(spec: &OptionSpec, raw: &str) -> Result<Vec<String>, ConfigError> {
    if spec.kind != OptionKind::List {
        return Err(ConfigError::invalid(
            spec.name,
            raw,
            format!("a {} option cannot take list operations", spec.kind),
        ));
    }

    let entries =
        split_entries(raw).map_err(|reason| ConfigError::invalid(spec.name, raw, reason))?;
    for entry in &entries {
        spec.check_entry(entry)
            .map_err(|reason| ConfigError::invalid(spec.name, entry, reason))?;
    }
    Ok(entries)
}

/// Strip one pair of surrounding double quotes, so `""` means empty
fn unquote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(raw)
}

/// Split a comma separated list into unique entries, first occurrence wins.
///
/// Entries may be wrapped in double quotes (which may then contain commas, and
/// `""` for a literal quote). Whitespace around entries is dropped, as are
/// empty entries, so `""` and `" , "` both yield an empty list.
pub fn split_entries(raw: &str) -> Result<Vec<String>, String> {
    let mut entries: Vec<String> = Vec::new();
    let mut chars = raw.chars().peekable();
    let mut more = true;

    while more {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut entry = String::new();
        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('"') => {
                        if chars.next_if_eq(&'"').is_some() {
                            entry.push('"');
                        } else {
                            break;
                        }
                    }
                    Some(c) => entry.push(c),
                    None => return Err("unterminated quoted entry".to_string()),
                }
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            match chars.next() {
                Some(',') => {}
                None => more = false,
                Some(c) => return Err(format!("unexpected '{c}' after quoted entry")),
            }
        } else {
            loop {
                match chars.next() {
                    Some(',') => break,
                    Some(c) => entry.push(c),
                    None => {
                        more = false;
                        break;
                    }
                }
            }
            entry.truncate(entry.trim_end().len());
        }

        if !entry.is_empty() && !entries.contains(&entry) {
            entries.push(entry);
        }
    }

    Ok(entries)
}

/// Append each addition not already present, at the end
fn union_into(entries: &mut Vec<String>, additions: Vec<String>) {
    for addition in additions {
        if !entries.contains(&addition) {
            entries.push(addition);
        }
    }
}
