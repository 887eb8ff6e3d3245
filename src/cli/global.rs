//! `ddev config global`: view and change the global configuration.
//!
//! The flags are generated from the option catalog. Their values are collected
//! back into an ordered batch of [`Operation`]s, in the order they were given
//! on the command line, and handed to the mutation engine.

use clap::{Arg, ArgAction, ArgMatches, Args, Command, FromArgMatches};
use ddev_globalconfig::catalog::{CATALOG, OptionKind};
use ddev_globalconfig::config::GlobalConfig;
use ddev_globalconfig::mutation::{self, Operation};
use std::error::Error;

const EXTRA_ARGS: &str = "extra-args";

#[derive(Debug, Default)]
pub struct GlobalArgs {
    pub operations: Vec<Operation>,
    /// Positional arguments, accepted and ignored
    pub ignored: Vec<String>,
}

impl Args for GlobalArgs {
    fn augment_args(cmd: Command) -> Command {
        let cmd = CATALOG.iter().fold(cmd, |cmd, spec| {
            let arg = Arg::new(spec.name)
                .long(spec.name)
                .help(spec.help)
                .action(ArgAction::Append);
            let arg = match spec.kind {
                OptionKind::Bool => arg
                    .num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
                    .value_name("true|false"),
                OptionKind::List => arg.num_args(1).allow_hyphen_values(true).value_name("LIST"),
                OptionKind::Int => arg.num_args(1).allow_hyphen_values(true).value_name("INT"),
                OptionKind::Str => arg.num_args(1).allow_hyphen_values(true).value_name("VALUE"),
            };
            let cmd = cmd.arg(arg);

            match spec.append_flag {
                Some(flag) => cmd.arg(
                    Arg::new(flag)
                        .long(flag)
                        .help(format!("Append entries to {}", spec.name))
                        .action(ArgAction::Append)
                        .num_args(1)
                        .allow_hyphen_values(true)
                        .value_name("LIST"),
                ),
                None => cmd,
            }
        });

        cmd.arg(
            Arg::new(EXTRA_ARGS)
                .num_args(0..)
                .action(ArgAction::Append)
                .hide(true),
        )
    }

    fn augment_args_for_update(cmd: Command) -> Command {
        Self::augment_args(cmd)
    }
}

impl FromArgMatches for GlobalArgs {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut indexed: Vec<(usize, Operation)> = Vec::new();

        for spec in CATALOG {
            for (index, value) in indexed_values(matches, spec.name) {
                let operation = match spec.kind {
                    OptionKind::List => Operation::set_list(spec.name, &value),
                    _ => Operation::set(spec.name, &value),
                };
                indexed.push((index, operation));
            }
            if let Some(flag) = spec.append_flag {
                for (index, value) in indexed_values(matches, flag) {
                    indexed.push((index, Operation::append(spec.name, &value)));
                }
            }
        }
        indexed.sort_by_key(|(index, _)| *index);

        let ignored = matches
            .get_many::<String>(EXTRA_ARGS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        Ok(Self {
            operations: indexed.into_iter().map(|(_, operation)| operation).collect(),
            ignored,
        })
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

fn indexed_values(matches: &ArgMatches, id: &str) -> Vec<(usize, String)> {
    match (matches.indices_of(id), matches.get_many::<String>(id)) {
        (Some(indices), Some(values)) => indices.zip(values.cloned()).collect(),
        _ => Vec::new(),
    }
}

pub fn handle_config_global(args: &GlobalArgs, json_output: bool) -> Result<(), Box<dyn Error>> {
    for arg in &args.ignored {
        log::warn!("Ignoring unexpected argument '{arg}'");
    }

    let config_path = GlobalConfig::config_path()?;
    let (config, recovered) = match GlobalConfig::load_from(&config_path) {
        Ok(config) => (config, false),
        Err(e) if e.is_corrupt() => {
            log::warn!("{e}; reinitializing with defaults");
            (GlobalConfig::new(), true)
        }
        Err(e) => return Err(e.into()),
    };

    let config = if args.operations.is_empty() {
        config
    } else {
        mutation::apply(&config, &args.operations)?
    };

    if recovered || !args.operations.is_empty() {
        config.save_to(&config_path)?;
        log::info!("Global configuration written to {}", config_path.display());
    }

    if json_output {
        println!("{}", config.to_json()?);
    } else {
        print!("{}", config.display());
    }

    Ok(())
}
