use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Environment variable naming the SDK root
pub const SDK_ROOT_ENV: &str = "QTDIR";

/// Command-line arguments for the stagepack tool
#[derive(Debug, Default)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Working directory (defaults to the current directory)
    pub dir: Option<PathBuf>,

    /// Path to a stagepack.toml config file
    pub config: Option<PathBuf>,

    /// Install list naming the files to package
    pub list: Option<PathBuf>,

    /// Staging directory
    pub staging: Option<PathBuf>,

    /// Output archive path
    pub output: Option<PathBuf>,

    /// SDK root containing platform plugins
    pub sdk_root: Option<PathBuf>,

    /// Platforms whose plugins should be installed
    pub platforms: Vec<String>,

    /// Let later files overwrite earlier ones with the same staged name
    pub allow_overwrite: bool,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            dir: matches.get_one::<String>("dir").map(PathBuf::from),
            config: matches.get_one::<String>("config").map(PathBuf::from),
            list: matches.get_one::<String>("list").map(PathBuf::from),
            staging: matches.get_one::<String>("staging").map(PathBuf::from),
            output: matches.get_one::<String>("output").map(PathBuf::from),
            sdk_root: matches
                .get_one::<String>("sdk-root")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            platforms: matches
                .get_many::<String>("platform")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            allow_overwrite: matches.get_flag("allow-overwrite"),
        }
    }
}

fn command() -> Command {
    Command::new("stagepack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stage build artifacts from an install list and pack them into a zip archive")
        .arg(
            Arg::new("dir")
                .short('C')
                .long("dir")
                .value_name("DIR")
                .help("Run as if started in DIR"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to config file (default: stagepack.toml if present)"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .value_name("FILE")
                .help("Install list, one file path per line (default: install_list.txt)"),
        )
        .arg(
            Arg::new("staging")
                .short('s')
                .long("staging")
                .value_name("DIR")
                .help("Staging directory, recreated on every run (default: bin)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output zip archive (default: package.zip)"),
        )
        .arg(
            Arg::new("sdk-root")
                .long("sdk-root")
                .value_name("DIR")
                .env(SDK_ROOT_ENV)
                .help("SDK root containing platform plugins"),
        )
        .arg(
            Arg::new("platform")
                .short('p')
                .long("platform")
                .value_name("NAME")
                .action(ArgAction::Append)
                .help("Install the platform plugin for NAME: windows, linux or macos (default: windows)"),
        )
        .arg(
            Arg::new("allow-overwrite")
                .long("allow-overwrite")
                .action(ArgAction::SetTrue)
                .help("Overwrite instead of failing when two files share a staged name"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
}
