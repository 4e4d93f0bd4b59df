use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use prcheck::models::CheckConfig;
use prcheck::telemetry;
use prcheck::{Context, Result};
use std::io;
use std::path::PathBuf;

/// Exit code for errors that stop the run before a report exists
const FATAL_EXIT_CODE: i32 = 2;

#[derive(Parser)]
#[command(name = "prcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Checks pull-request descriptions against the contribution policy", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to .github/prcheck.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Debug-level logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a pull request on GitHub, then print the result or comment on the PR
    Check(prcheck::cli::check::CheckArgs),

    /// Check a PR description from local files
    Lint(prcheck::cli::lint::LintArgs),

    /// Print the sections of a markdown body as JSON
    Sections {
        /// Markdown file ("-" for stdin)
        input: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_json, telemetry::level_for(cli.verbose));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to start runtime: {}", e).red());
            std::process::exit(FATAL_EXIT_CODE);
        }
    };

    match runtime.block_on(run_async(cli)) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(FATAL_EXIT_CODE);
        }
    }
}

async fn run_async(cli: Cli) -> Result<i32> {
    let config_path = CheckConfig::path_or_default(cli.config);
    let load_config = || {
        CheckConfig::load(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))
    };

    match cli.command {
        Commands::Check(args) => {
            let config = load_config()?;
            prcheck::cli::check::run(args, &config).await
        }

        Commands::Lint(args) => {
            let config = load_config()?;
            prcheck::cli::lint::run(args, &config)
        }

        Commands::Sections { input } => {
            prcheck::cli::sections::run(&input)?;
            Ok(0)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "prcheck", &mut io::stdout());
            Ok(0)
        }
    }
}
