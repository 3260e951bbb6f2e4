//! Study Toolbox CLI
//!
//! Three small tools for students:
//! - Pomodoro timer: 25 minutes of work, 5 minute breaks, a long break
//!   after every 4 sessions
//! - GPA calculator with named records and an editable grade scale
//! - Expense tracker with categories and monthly budgets

use anyhow::Result;
use clap::{CommandFactory, Parser};

use toolbox::cli::{handlers, Cli, Commands, Display};
use toolbox::storage::DataDir;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        // No command provided, show help
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        generate_completions(shell);
        return Ok(());
    }

    let data = DataDir::resolve(cli.data_dir)?;
    tracing::debug!("using data directory {}", data.root().display());

    match command {
        Commands::Timer { command } => handlers::timer(&data, command).await,
        Commands::Gpa { command } => handlers::gpa(&data, command),
        Commands::Expense { command } => handlers::expense(&data, command),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
