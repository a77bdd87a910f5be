//! Command-line grammar.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per item.
    #[default]
    Simple,
    /// Pretty-printed JSON.
    Json,
    /// Box-drawn tables.
    Table,
}

impl OutputFormat {
    /// Every accepted name, in display order.
    pub const NAMES: [&'static str; 3] = ["simple", "json", "table"];

    /// Parse a stored or typed name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "simple" => Some(OutputFormat::Simple),
            "json" => Some(OutputFormat::Json),
            "table" => Some(OutputFormat::Table),
            _ => None,
        }
    }

    /// The canonical name.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

/// Grouping for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    /// One section per calendar month.
    Month,
}

/// Taiwan public holiday lookup.
#[derive(Debug, Parser)]
#[command(name = "holiday", version, about, long_about = None)]
pub struct Cli {
    /// Fetch fresh data instead of reading the cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// `-f/--format`, shared by every printing command.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct FormatArg {
    /// Output format (defaults to the `format` setting)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether a date is a holiday
    Check {
        /// YYYY-MM-DD, YYYYMMDD, today, tomorrow, yesterday, next <weekday>, 3d, 2w, 1m
        date: String,
        #[command(flatten)]
        format: FormatArg,
    },

    /// Check whether today is a holiday
    Today {
        #[command(flatten)]
        format: FormatArg,
    },

    /// List holidays between two dates
    Range {
        /// First date (inclusive)
        start: String,
        /// Last date (inclusive)
        end: String,
        /// Also list makeup workdays within a month of the range
        #[arg(long)]
        include_workdays: bool,
        #[command(flatten)]
        format: FormatArg,
    },

    /// Holiday statistics for a year or month
    Stats {
        /// Year
        year: u16,
        /// Month (1-12)
        month: Option<u8>,
        #[command(flatten)]
        format: FormatArg,
    },

    /// List every record of a year
    List {
        /// Year
        year: u16,
        /// Only days off
        #[arg(long)]
        holidays_only: bool,
        /// Group the listing
        #[arg(long, value_enum)]
        group_by: Option<GroupBy>,
        #[command(flatten)]
        format: FormatArg,
    },

    /// Show the supported year range
    Years {
        #[command(flatten)]
        format: FormatArg,
    },

    /// Show the next holiday(s)
    Next {
        /// Skip Saturdays and Sundays with no specific designation
        #[arg(long)]
        skip_weekends: bool,
        /// How many holidays to show
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Search after this date instead of today
        #[arg(long, default_value = "today")]
        from: String,
        #[command(flatten)]
        format: FormatArg,
    },

    /// List the holidays of one month
    Month {
        /// Year
        year: u16,
        /// Month (1-12)
        month: u8,
        #[command(flatten)]
        format: FormatArg,
    },

    /// Count workdays in one month
    Workdays {
        /// Year
        year: u16,
        /// Month (1-12)
        month: u8,
        #[command(flatten)]
        format: FormatArg,
    },

    /// Count workdays between two dates
    Between {
        /// First date (inclusive)
        start: String,
        /// Last date (inclusive)
        end: String,
        /// Print only the workday count
        #[arg(short, long)]
        workdays: bool,
        #[command(flatten)]
        format: FormatArg,
    },

    /// Inspect or clear the cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Read or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check the data endpoint and cache
    Health {
        #[command(flatten)]
        format: FormatArg,
    },

    /// Print a shell completion script
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `cache` subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show cached years and entry count
    Status {
        #[command(flatten)]
        format: FormatArg,
    },
    /// Drop every cached year
    Clear,
}

/// `config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show every setting
    List {
        #[command(flatten)]
        format: FormatArg,
    },
    /// Print one setting
    Get {
        /// Setting name
        key: String,
    },
    /// Change one setting
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
}

/// Subcommand names, including clap's `help`.
pub const KNOWN_COMMANDS: [&str; 15] = [
    "check",
    "today",
    "range",
    "stats",
    "list",
    "years",
    "next",
    "month",
    "workdays",
    "between",
    "cache",
    "config",
    "health",
    "completion",
    "help",
];

/// Insert `check` when the first positional argument is a date rather than
/// a command, so `holiday 2025-10-10` works like `holiday check 2025-10-10`.
///
/// `args[0]` is the program name.  `check` goes directly after it, so flags
/// written before the date (`holiday -f json 2025-10-10`) become its flags.
pub fn preprocess_args(mut args: Vec<String>) -> Vec<String> {
    let implied = first_positional(&args)
        .is_some_and(|a| !KNOWN_COMMANDS.contains(&a) && looks_like_date(a));
    if implied {
        args.insert(1, "check".to_string());
    }
    args
}

/// The first argument that is neither a flag nor the value of `-f/--format`.
fn first_positional(args: &[String]) -> Option<&str> {
    let mut rest = args.iter().skip(1).map(String::as_str);
    while let Some(arg) = rest.next() {
        match arg {
            "-f" | "--format" => {
                rest.next();
            }
            _ if arg.starts_with('-') => {}
            _ => return Some(arg),
        }
    }
    None
}

fn looks_like_date(arg: &str) -> bool {
    let lower = arg.to_lowercase();
    lower.starts_with(|c: char| c.is_ascii_digit())
        || ["today", "tomorrow", "yesterday", "next"]
            .iter()
            .any(|p| lower.starts_with(p))
}
