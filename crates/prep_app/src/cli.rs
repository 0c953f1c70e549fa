use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "meeting_prep")]
#[command(about = "Meeting preparation client")]
pub struct Cli {
    /// RON configuration file.
    #[arg(long, global = true, default_value = "meeting_prep.ron")]
    pub config: PathBuf,
    /// Log destination; overrides the configuration file.
    #[arg(long, global = true, value_enum)]
    pub log: Option<LogTarget>,
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Submit the meeting form and export the rendered result.
    Prepare(PrepareArgs),
    /// Format raw result text into HTML (stdin when no file is given).
    Format { file: Option<PathBuf> },
    /// List the sections of a rendered result, optionally copying one.
    Sections {
        file: PathBuf,
        #[arg(long)]
        copy: Option<usize>,
        #[arg(long, value_enum)]
        copy_format: Option<CopyFormatArg>,
    },
    /// Print the default configuration as RON.
    Config,
}

#[derive(Args)]
pub struct PrepareArgs {
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub objective: String,
    #[arg(long)]
    pub attendees: String,
    /// Meeting duration in minutes.
    #[arg(long)]
    pub duration: u32,
    #[arg(long)]
    pub focus: Option<String>,
    /// Host the form is considered to be served from.
    #[arg(long)]
    pub page_host: Option<String>,
    #[arg(long, value_enum)]
    pub endpoint_mode: Option<EndpointModeArg>,
    /// Page origin for `--endpoint-mode relative`.
    #[arg(long)]
    pub origin: Option<String>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    #[arg(long)]
    pub no_export: bool,
    /// Copy the N-th section (0-based) once the result is shown.
    #[arg(long)]
    pub copy_section: Option<usize>,
    #[arg(long, value_enum)]
    pub copy_format: Option<CopyFormatArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EndpointModeArg {
    AbsoluteByHost,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CopyFormatArg {
    PlainText,
    HtmlStripped,
}
