use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use spectest::cmd::run::{RunCommandArgs, run_with_stdin};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "spectest",
    version,
    about = "Run assertion scripts against YAML documents"
)]
struct Cli {
    /// YAML files to test; reads stdin when omitted.
    files: Vec<PathBuf>,

    /// Directory containing `.rhai` test scripts.
    #[arg(
        short = 't',
        long = "tests",
        default_value = "tests",
        env = "SPECTEST_TESTS"
    )]
    tests: PathBuf,

    /// Report passing assertions as well as failures.
    #[arg(long)]
    verbose: bool,

    /// Emit diagnostics as JSON lines.
    #[arg(long)]
    json: bool,

    /// Comma-separated environment variables exposed to scripts as `env`.
    #[arg(short = 'e', long = "env", value_delimiter = ',')]
    env: Vec<String>,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json);

    if cli.files.is_empty() && std::io::stdin().is_terminal() {
        tracing::error!("you must pass at least one file as an argument");
        return 2;
    }

    let args = RunCommandArgs {
        files: cli.files,
        tests_dir: cli.tests,
        env_vars: cli.env,
    };
    let stdin = std::io::stdin();
    match run_with_stdin(&args, stdin.lock()) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            tracing::error!("{error}");
            2
        }
    }
}

fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("SPECTEST_LOG")
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stdout);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
