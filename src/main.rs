use clap::Parser;

use drift::report::DEFAULT_PATH_COLUMNS;
use drift::scan::{Options, scan};

/// Scan directories for git working trees with unstaged or unpushed work.
///
/// Reads one directory path per line on standard input and prints a line for
/// every repository that has unstaged changes or commits its upstream does
/// not have. Paths that are not git repositories, or that are clean and not
/// ahead, produce no output.
#[derive(Parser)]
#[command(name = "drift", version, about)]
struct Cli {
    /// Long format: commit, refs and change counts for each repository
    #[arg(short = 'l', long = "long")]
    long: bool,

    /// Path column width for long format; anything that is not a positive
    /// integer means the default
    #[arg(
        short = 'c',
        long = "columns",
        value_name = "N",
        default_value_t = DEFAULT_PATH_COLUMNS,
        value_parser = parse_columns
    )]
    columns: usize,

    /// Kill any single git invocation after this many seconds (default: wait
    /// forever)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

/// `-c` never fails; malformed values fall back to the default width.
fn parse_columns(value: &str) -> Result<usize, std::convert::Infallible> {
    Ok(value
        .parse::<usize>()
        .ok()
        .filter(|columns| *columns > 0)
        .unwrap_or(DEFAULT_PATH_COLUMNS))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = Options {
        long: cli.long,
        columns: cli.columns,
        timeout: cli.timeout.map(std::time::Duration::from_secs),
    };

    let stdin = std::io::stdin();
    let mut out = drift::styling::stdout().lock();
    if let Err(e) = scan(stdin.lock(), &mut out, &options) {
        // The exit code stays 0 even if stdout goes away mid-scan.
        log::debug!("report output ended early: {e}");
    }
}
