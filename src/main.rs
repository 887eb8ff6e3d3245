//! ddev - global configuration command line.
//!
//! `ddev config global` shows the global configuration and, when given option
//! flags, applies them as one all-or-nothing batch before writing the result
//! back to `global_config.yaml`. Every flag corresponds to an entry of the
//! option catalog; list options also get an `--<name>-add` form that appends
//! instead of replacing.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};
use owo_colors::OwoColorize;
use std::error::Error;
use std::io;

mod cli;

use cli::global::GlobalArgs;

#[derive(Parser)]
#[command(name = "ddev")]
#[command(about = "Manage ddev global configuration")]
#[command(version)]
struct Cli {
    /// Print output as JSON
    #[arg(short = 'j', long, global = true)]
    json_output: bool,
    /// Log debug information to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// View or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Change global configuration (shows it when no flags are given)
    Global(GlobalArgs),
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn Error>> {
    use simplelog::*;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Global(args) => {
                cli::global::handle_config_global(&args, cli.json_output)?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
