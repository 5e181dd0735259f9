use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use tolgee_pull_cli::config::{load_config, resolve_settings};
use tolgee_pull_cli::convert::{print_report, run_convert_command};
use tolgee_pull_cli::inspect::print_inspect;

/// Exit code when at least one catalog failed and `--strict` was given.
const EXIT_PARTIAL_FAILURE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "tolgee-pull", author, version, about, long_about = None)]
struct Args {
    /// Log progress of every file (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an unpacked Tolgee export into the project's resource format.
    Convert {
        /// Directory holding the unpacked export
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the converted files are written to [default: i18n]
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Target format: json or xml [default: xml]
        #[arg(short, long)]
        format: Option<String>,

        /// Config file [default: ./tolgee-pull.toml when present]
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exit with status 2 when any file failed
        #[arg(long)]
        strict: bool,
    },

    /// Show the string resources of a written strings.xml.
    Inspect {
        /// The strings.xml file to inspect
        #[arg(short, long)]
        input: PathBuf,

        /// Display full value without truncation
        #[arg(long)]
        full: bool,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args.commands) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Convert {
            input,
            output_dir,
            format,
            config,
            strict,
        } => {
            let file_config = load_config(config.as_deref())?;
            let settings = resolve_settings(output_dir, format, file_config)?;
            let report = run_convert_command(&input, &settings)?;
            print_report(&report);
            if strict && !report.is_success() {
                std::process::exit(EXIT_PARTIAL_FAILURE);
            }
        }
        Commands::Inspect { input, full } => {
            print_inspect(&input, full)?;
        }
        Commands::Completions { shell } => {
            let mut command = Args::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        }
    }
    Ok(())
}
