use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Merge a repository's text files into a single document.",
    long_about = "repomerge clones a repository (or takes an existing checkout), walks its tree, \nfilters out binary, oversized and pattern-excluded files, and concatenates the \nsurvivors into one text artifact with a path header per file.",
    after_help = "EXAMPLES:\n  repomerge https://github.com/user/project.git\n  repomerge ./checkout -o project.txt -e '\\.lock$' -e 'generated'\n  repomerge https://github.com/user/project.git -m 2MiB --json"
)]
pub struct Cli {
    #[arg(
        value_name = "REPO",
        help = "Repository URL to clone, or path to an existing local checkout."
    )]
    pub repo: String,

    #[arg(
        short = 'o',
        long,
        value_name = "PATH",
        default_value = repomerge_core::DEFAULT_OUTPUT_FILENAME,
        help = "Path of the merged output document.",
        help_heading = "Output Control"
    )]
    pub output: PathBuf,

    #[arg(
        long,
        help = "Print the run summary as JSON instead of formatted text.",
        help_heading = "Output Control"
    )]
    pub json: bool,

    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "REGEX",
        action = clap::ArgAction::Append,
        help = "Regex pattern for paths to exclude; repeatable. A match anywhere in the relative path excludes the file.",
        help_heading = "Filtering"
    )]
    pub exclude: Vec<String>,

    #[arg(
        short = 'm',
        long = "max-size",
        value_name = "SIZE",
        default_value = "5MiB",
        help = "Maximum file size to include (e.g. '5MiB', '512KB').",
        help_heading = "Filtering"
    )]
    pub max_size: String,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}
