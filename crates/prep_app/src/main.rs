mod cli;
mod platform;

use std::path::Path;

use clap::Parser;
use log::LevelFilter;
use prep_logging::LogDestination;

use cli::{Cli, Command, LogTarget};
use platform::{commands, config};

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
            LogTarget::Off => LogDestination::Off,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = config::read_config(&cli.config);
    let destination = match (cli.log, &loaded) {
        (Some(target), _) => target.into(),
        (None, Ok(persisted)) => persisted.log_destination(),
        (None, Err(_)) => LogDestination::default(),
    };
    let log_file = loaded
        .as_ref()
        .ok()
        .and_then(|persisted| persisted.log_file().map(Path::to_path_buf));
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    prep_logging::initialize(destination, level, log_file.as_deref());
    let config = config::resolve_config(loaded);

    match cli.cmd {
        Command::Prepare(args) => commands::prepare(config, args),
        Command::Format { file } => commands::format(file.as_deref()),
        Command::Sections {
            file,
            copy,
            copy_format,
        } => commands::sections(&config, &file, copy, copy_format),
        Command::Config => commands::print_default_config(),
    }
}
