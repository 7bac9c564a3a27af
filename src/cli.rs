use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Examples:
  sizetree -d .               Report every directory below the current one
  sizetree -d /var -L 2       Only print the top two levels
  sizetree -d ~ -vv 2>scan.log  Trace each directory entered

Exit status:
  0  report complete
  1  fatal error, no report
  2  usage error
  3  report written, some entries could not be read
  130  interrupted";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sizetree",
    version,
    about = "Per-directory disk usage as a depth-first CSV report",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Directory to scan
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: PathBuf,

    /// Max report depth (sizes still include deeper levels)
    #[arg(short = 'L', long = "level")]
    pub max_depth: Option<usize>,

    /// Increase diagnostic output on stderr (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report fatal errors on stderr
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        if self.quiet {
            self.verbose = 0;
        }
        self
    }
}
